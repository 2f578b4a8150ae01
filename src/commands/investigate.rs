use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::{render, send_chunked};
use crate::state::Context;
use crate::swarm::events::{RejectReason, RunOutcome, SwarmEvent};

/// Launch an investigation: Scanner, Verifier, Contextualizer, then Writer
#[poise::command(slash_command, guild_only)]
pub async fn investigate(
    ctx: Context<'_>,
    #[description = "Topic to investigate"] topic: String,
) -> Result<(), anyhow::Error> {
    let investigator = ctx.data().investigator.clone();

    if topic.trim().is_empty() {
        ctx.say("Give me a topic to investigate.").await?;
        return Ok(());
    }
    if investigator.is_running().await {
        ctx.say("An investigation is already in progress. Wait for it to finish.")
            .await?;
        return Ok(());
    }

    info!(user = ctx.author().name, topic, "Investigation requested");

    // Subscribe before starting so no early event is missed.
    let mut events = investigator.subscribe();
    let progress = ctx
        .say(format!("**Investigation:** {}\nSpinning up the swarm...", topic.trim()))
        .await?;

    let run = investigator.run(&topic);
    tokio::pin!(run);

    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            event = events.recv() => match event {
                Ok(SwarmEvent::StatusChanged { .. }) | Ok(SwarmEvent::LogAppended { .. }) => {
                    let state = investigator.snapshot().await;
                    let edit = poise::CreateReply::default().content(render::format_progress(&state));
                    if let Err(e) = progress.edit(ctx, edit).await {
                        warn!(error = %e, "Failed to update progress message");
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Progress subscriber lagged"),
                Err(RecvError::Closed) => {}
            },
        }
    };

    let state = investigator.snapshot().await;
    match outcome {
        RunOutcome::Rejected { reason } => {
            let message = match reason {
                RejectReason::EmptyTopic => "Give me a topic to investigate.",
                RejectReason::AlreadyRunning => {
                    "An investigation is already in progress. Wait for it to finish."
                }
            };
            progress
                .edit(ctx, poise::CreateReply::default().content(message))
                .await?;
        }
        RunOutcome::Completed => {
            progress
                .edit(
                    ctx,
                    poise::CreateReply::default().content(render::format_progress(&state)),
                )
                .await?;

            let mut full = state.report_text.clone();
            let sources = render::format_sources(&state.sources);
            if !sources.is_empty() {
                full.push_str("\n\n");
                full.push_str(&sources);
            }
            send_chunked(&ctx, &full).await?;
        }
        RunOutcome::Aborted { error } => {
            progress
                .edit(
                    ctx,
                    poise::CreateReply::default().content(render::format_progress(&state)),
                )
                .await?;
            ctx.say(format!(
                "Investigation aborted: {}\nRun `/truthseeker investigate` again when ready.",
                error
            ))
            .await?;
        }
    }

    Ok(())
}
