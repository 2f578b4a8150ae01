use std::fmt;

/// Who produced a log entry or holds the floor. `Idle` is the orchestrator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Scanner,
    Verifier,
    Contextualizer,
    Writer,
    Idle,
}

/// Display metadata for a role.
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl AgentRole {
    /// The four working roles in pipeline order.
    pub const STAGES: [AgentRole; 4] = [
        AgentRole::Scanner,
        AgentRole::Verifier,
        AgentRole::Contextualizer,
        AgentRole::Writer,
    ];

    pub fn profile(self) -> AgentProfile {
        let (name, description, icon) = match self {
            AgentRole::Scanner => (
                "Scanner",
                "Monitors real-time feeds & global indices.",
                "📡",
            ),
            AgentRole::Verifier => (
                "Verifier",
                "Cross-references claims against trusted dbs.",
                "🛡️",
            ),
            AgentRole::Contextualizer => (
                "Contextualizer",
                "Analyzes historical patterns & precedents.",
                "📚",
            ),
            AgentRole::Writer => (
                "Writer",
                "Synthesizes intelligence into final brief.",
                "🖋️",
            ),
            AgentRole::Idle => ("Orchestrator", "System Standby", "🖥️"),
        };
        AgentProfile {
            name,
            description,
            icon,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_excludes_idle() {
        assert_eq!(AgentRole::STAGES.len(), 4);
        assert!(!AgentRole::STAGES.contains(&AgentRole::Idle));
        assert_eq!(AgentRole::STAGES[0], AgentRole::Scanner);
        assert_eq!(AgentRole::STAGES[3], AgentRole::Writer);
    }

    #[test]
    fn test_idle_is_orchestrator() {
        assert_eq!(AgentRole::Idle.to_string(), "Orchestrator");
        assert_eq!(AgentRole::Idle.profile().description, "System Standby");
    }
}
