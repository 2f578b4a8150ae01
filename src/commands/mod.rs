mod inspect;
mod investigate;
pub mod render;

use crate::state::Context;

/// TruthSeeker - multi-agent investigative reports
#[poise::command(
    slash_command,
    subcommands(
        "investigate::investigate",
        "inspect::status",
        "inspect::report",
        "inspect::logs",
        "inspect::agents"
    )
)]
pub async fn truthseeker(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send text in Discord-safe chunks.
/// Uses ctx.say() for all chunks so follow-ups go through the interaction
/// webhook, which doesn't require Send Messages channel permission.
pub(crate) async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in render::split_chunks(text, render::MAX_MESSAGE_LEN) {
        ctx.say(chunk).await?;
    }
    Ok(())
}
