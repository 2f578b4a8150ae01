use super::{render, send_chunked};
use crate::state::Context;

/// Show what the swarm is doing right now
#[poise::command(slash_command, guild_only)]
pub async fn status(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let state = ctx.data().investigator.snapshot().await;
    ctx.say(render::format_status(&state, &ctx.data().model))
        .await?;
    Ok(())
}

/// Re-post the most recent report with its sources
#[poise::command(slash_command, guild_only)]
pub async fn report(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let state = ctx.data().investigator.snapshot().await;

    if state.report_text.is_empty() {
        let message = if state.is_running {
            "The report is still being written."
        } else {
            "No report yet. Use `/truthseeker investigate` to start one."
        };
        ctx.say(message).await?;
        return Ok(());
    }

    let mut full = state.report_text.clone();
    let sources = render::format_sources(&state.sources);
    if !sources.is_empty() {
        full.push_str("\n\n");
        full.push_str(&sources);
    }
    send_chunked(&ctx, &full).await
}

/// Show the activity log of the current or last investigation
#[poise::command(slash_command, guild_only)]
pub async fn logs(
    ctx: Context<'_>,
    #[description = "Max entries to show (newest)"] limit: Option<u32>,
) -> Result<(), anyhow::Error> {
    let limit = limit.unwrap_or(25) as usize;
    let state = ctx.data().investigator.snapshot().await;

    if state.log.is_empty() {
        ctx.say("The log is empty.").await?;
        return Ok(());
    }

    let output = format!(
        "**Activity log** ({} of {} entries)\n{}",
        limit.min(state.log.len()),
        state.log.len(),
        render::format_log(state.log.tail(limit))
    );
    send_chunked(&ctx, &output).await
}

/// List the agents in the swarm
#[poise::command(slash_command, guild_only)]
pub async fn agents(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    ctx.say(render::format_roster()).await?;
    Ok(())
}
