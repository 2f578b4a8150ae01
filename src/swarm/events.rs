//! # Swarm Events
//!
//! Push notifications for whatever is rendering an investigation. The
//! orchestrator publishes one event per state change; subscribers that lag
//! behind the channel capacity lose the oldest events, not the run.

use tokio::sync::broadcast;

use super::agents::AgentRole;
use super::log::LogEntry;
use crate::llm::Source;

const CHANNEL_CAPACITY: usize = 256;

/// Why a start request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyTopic,
    AlreadyRunning,
}

/// Result of asking the orchestrator to investigate a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Rejected { reason: RejectReason },
    Completed,
    Aborted { error: String },
}

#[derive(Debug, Clone)]
pub enum SwarmEvent {
    RunStarted { topic: String },
    StatusChanged { agent: AgentRole, status: String },
    LogAppended { entry: LogEntry },
    SourcesAdded { sources: Vec<Source> },
    ReportUpdated { len: usize },
    Finished { outcome: RunOutcome },
}

pub struct EventBus {
    sender: broadcast::Sender<SwarmEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: SwarmEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SwarmEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(SwarmEvent::ReportUpdated { len: 3 });
    }

    #[tokio::test]
    async fn test_subscriber_receives_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(SwarmEvent::RunStarted {
            topic: "t".to_string(),
        });
        bus.publish(SwarmEvent::Finished {
            outcome: RunOutcome::Completed,
        });

        assert!(matches!(rx.recv().await.unwrap(), SwarmEvent::RunStarted { .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SwarmEvent::Finished {
                outcome: RunOutcome::Completed
            }
        ));
    }
}
