use std::sync::Arc;

use crate::swarm::Investigator;

pub struct AppState {
    pub investigator: Arc<Investigator>,
    /// Model identifier, shown in status replies.
    pub model: String,
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
