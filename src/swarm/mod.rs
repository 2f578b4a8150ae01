pub mod agents;
pub mod events;
pub mod log;
pub mod prompts;
pub mod sources;
pub mod stage;

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info};

use crate::llm::{GenerationError, Generator, Source, StageResult};

use agents::AgentRole;
use events::{EventBus, RejectReason, RunOutcome, SwarmEvent};
use log::{ActivityLog, LogKind};
use stage::Stage;

pub const STANDBY_STATUS: &str = "Standing by for next directive.";
pub const ABORTED_STATUS: &str = "Protocol Aborted. System Failure.";

/// Everything a front end needs to render an investigation.
#[derive(Debug, Clone)]
pub struct RunState {
    pub is_running: bool,
    pub current_agent: AgentRole,
    pub status_message: String,
    pub topic: Option<String>,
    pub log: ActivityLog,
    /// Raw citations in arrival order; deduplicate with `sources::dedup_by_uri` for display.
    pub sources: Vec<Source>,
    pub report_text: String,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            is_running: false,
            current_agent: AgentRole::Idle,
            status_message: STANDBY_STATUS.to_string(),
            topic: None,
            log: ActivityLog::new(),
            sources: Vec::new(),
            report_text: String::new(),
        }
    }
}

impl RunState {
    /// Back to initial values. The log keeps its id counter.
    fn reset(&mut self) {
        self.is_running = false;
        self.current_agent = AgentRole::Idle;
        self.status_message = STANDBY_STATUS.to_string();
        self.topic = None;
        self.log.clear();
        self.sources.clear();
        self.report_text.clear();
    }
}

/// Drives the Scan → Verify → Contextualize → Write chain for one topic at a time.
///
/// Each state transition (a stage starting, a stage finishing, an abort, the
/// final cleanup) is applied under one write guard that is never held across a
/// generation call, so `snapshot()` never sees half of a transition.
pub struct Investigator {
    generator: Arc<dyn Generator>,
    state: RwLock<RunState>,
    events: EventBus,
}

impl Investigator {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            state: RwLock::new(RunState::default()),
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SwarmEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> RunState {
        self.state.read().await.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.is_running
    }

    /// Run a full investigation. Returns `Rejected` without touching any state
    /// when the topic is blank or another run is in flight.
    pub async fn run(&self, topic: &str) -> RunOutcome {
        let topic = topic.trim();
        if topic.is_empty() {
            return RunOutcome::Rejected {
                reason: RejectReason::EmptyTopic,
            };
        }

        let events = {
            let mut state = self.state.write().await;
            if state.is_running {
                debug!(topic, "investigation rejected, run already active");
                return RunOutcome::Rejected {
                    reason: RejectReason::AlreadyRunning,
                };
            }
            state.reset();
            state.is_running = true;
            state.topic = Some(topic.to_string());

            let mut transition = Transition::new(&mut state);
            transition.events.push(SwarmEvent::RunStarted {
                topic: topic.to_string(),
            });
            transition.log(
                AgentRole::Idle,
                format!("INITIALIZING SWARM PROTOCOL: TARGET \"{}\"", topic),
                LogKind::Info,
            );
            transition.events
        };
        self.publish_all(events);
        info!(topic, "Investigation started");

        let outcome = match self.execute(topic).await {
            Ok(()) => {
                info!(topic, "Investigation complete");
                RunOutcome::Completed
            }
            Err(e) => {
                error!(topic, error = %e, "Investigation aborted");
                self.commit(|t| {
                    t.log(AgentRole::Idle, format!("CRITICAL ERROR: {}", e), LogKind::Error);
                    t.status(AgentRole::Idle, ABORTED_STATUS);
                })
                .await;
                RunOutcome::Aborted {
                    error: e.to_string(),
                }
            }
        };

        self.commit(|t| {
            if outcome == RunOutcome::Completed {
                t.log(
                    AgentRole::Idle,
                    "MISSION ACCOMPLISHED. REPORT FILED.",
                    LogKind::Success,
                );
            }
            t.finish(&outcome);
        })
        .await;

        outcome
    }

    /// The four stages in order. The first error ends the chain.
    async fn execute(&self, topic: &str) -> Result<(), GenerationError> {
        let scan = self
            .run_stage(Stage::Scan, topic, prompts::scanner_prompt(topic))
            .await?;

        let verified = self
            .run_stage(
                Stage::Verify,
                topic,
                prompts::verifier_prompt(topic, &scan.text),
            )
            .await?;

        let context = self
            .run_stage(
                Stage::Contextualize,
                topic,
                prompts::contextualizer_prompt(topic, &verified.text),
            )
            .await?;

        let report = self
            .run_stage(
                Stage::Write,
                topic,
                prompts::writer_prompt(topic, &scan.text, &verified.text, &context.text),
            )
            .await?;

        debug!(report_len = report.text.len(), "Report filed");
        Ok(())
    }

    async fn run_stage(
        &self,
        stage: Stage,
        topic: &str,
        prompt: String,
    ) -> Result<StageResult, GenerationError> {
        let role = stage.role();

        // Visible to observers before the call suspends.
        self.commit(|t| {
            t.status(role, stage.status_message());
            t.log(role, stage.thinking_message(topic), LogKind::Thinking);
        })
        .await;
        info!(stage = %role, use_search = stage.uses_search(), "Stage started");

        let result = self
            .generator
            .generate(&prompt, stage.system_instruction(), stage.uses_search())
            .await?;

        info!(
            stage = %role,
            text_len = result.text.len(),
            source_count = result.sources.len(),
            "Stage complete"
        );

        self.commit(|t| {
            if stage.uses_search() {
                t.add_sources(&result.sources);
            }
            if stage == Stage::Write {
                t.set_report(&result.text);
            }
            t.log(role, stage.success_message(), LogKind::Success);
        })
        .await;
        Ok(result)
    }

    /// Apply one state transition under a single write guard, then publish its
    /// events once the guard is released.
    async fn commit(&self, apply: impl FnOnce(&mut Transition<'_>)) {
        let events = {
            let mut state = self.state.write().await;
            let mut transition = Transition::new(&mut state);
            apply(&mut transition);
            transition.events
        };
        self.publish_all(events);
    }

    fn publish_all(&self, events: Vec<SwarmEvent>) {
        for event in events {
            self.events.publish(event);
        }
    }
}

/// Pending writes to a locked `RunState` plus the events they produce.
struct Transition<'a> {
    state: &'a mut RunState,
    events: Vec<SwarmEvent>,
}

impl<'a> Transition<'a> {
    fn new(state: &'a mut RunState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }

    fn status(&mut self, agent: AgentRole, status: &str) {
        self.state.current_agent = agent;
        self.state.status_message = status.to_string();
        self.events.push(SwarmEvent::StatusChanged {
            agent,
            status: status.to_string(),
        });
    }

    fn log(&mut self, agent: AgentRole, message: impl Into<String>, kind: LogKind) {
        let entry = self.state.log.append(agent, message, kind);
        self.events.push(SwarmEvent::LogAppended { entry });
    }

    fn add_sources(&mut self, sources: &[Source]) {
        if sources.is_empty() {
            return;
        }
        self.state.sources.extend_from_slice(sources);
        self.events.push(SwarmEvent::SourcesAdded {
            sources: sources.to_vec(),
        });
    }

    fn set_report(&mut self, text: &str) {
        self.state.report_text = text.to_string();
        self.events.push(SwarmEvent::ReportUpdated { len: text.len() });
    }

    /// Terminal cleanup, run on every exit path.
    fn finish(&mut self, outcome: &RunOutcome) {
        self.state.is_running = false;
        self.status(AgentRole::Idle, STANDBY_STATUS);
        self.events.push(SwarmEvent::Finished {
            outcome: outcome.clone(),
        });
    }
}
