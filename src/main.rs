mod commands;
mod config;
mod llm;
mod state;
mod swarm;

use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tracing::{error, info, Level};

use config::{BotConfig, GenerationConfig};
use llm::GeminiClient;
use state::AppState;
use swarm::Investigator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let bot_config = BotConfig::from_env()?;
    let gen_config = GenerationConfig::from_env();

    // Init generation client
    let client = GeminiClient::new(gen_config).context("Failed to create HTTP client")?;
    if client.has_credential() {
        info!(model = client.model(), "Generation client initialized");
    } else {
        // Investigations will abort with a configuration error until this is fixed.
        error!("GEMINI_API_KEY is not set; investigations will fail");
    }
    let model = client.model().to_string();

    let investigator = Arc::new(Investigator::new(Arc::new(client)));
    let app_state = AppState {
        investigator,
        model,
    };

    let guild_id = bot_config.guild_id.map(serenity::GuildId::new);
    let intents = serenity::GatewayIntents::GUILDS;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::truthseeker()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting TruthSeeker Discord bot...");

    let mut client = serenity::ClientBuilder::new(&bot_config.token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
