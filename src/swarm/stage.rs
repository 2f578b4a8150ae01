use super::agents::AgentRole;
use super::prompts;

/// One of the four sequential generation calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Verify,
    Contextualize,
    Write,
}

impl Stage {
    pub fn role(self) -> AgentRole {
        match self {
            Stage::Scan => AgentRole::Scanner,
            Stage::Verify => AgentRole::Verifier,
            Stage::Contextualize => AgentRole::Contextualizer,
            Stage::Write => AgentRole::Writer,
        }
    }

    /// Only the discovery stages may use web search; their citations feed the source list.
    pub fn uses_search(self) -> bool {
        matches!(self, Stage::Scan | Stage::Verify)
    }

    pub fn system_instruction(self) -> &'static str {
        match self {
            Stage::Scan => prompts::SCANNER_SYSTEM,
            Stage::Verify => prompts::VERIFIER_SYSTEM,
            Stage::Contextualize => prompts::CONTEXTUALIZER_SYSTEM,
            Stage::Write => prompts::WRITER_SYSTEM,
        }
    }

    pub fn status_message(self) -> &'static str {
        match self {
            Stage::Scan => "Scanning global news feeds and social signals...",
            Stage::Verify => "Cross-referencing claims with knowledge graph...",
            Stage::Contextualize => "Accessing historical archives and pattern matching...",
            Stage::Write => "Compiling final investigative dossier...",
        }
    }

    pub fn thinking_message(self, topic: &str) -> String {
        match self {
            Stage::Scan => format!("Monitoring live feeds for keywords: {}...", topic),
            Stage::Verify => "Validating intelligence against trusted sources...".to_string(),
            Stage::Contextualize => "Querying deep history databases...".to_string(),
            Stage::Write => "Synthesizing Final Investigative Report...".to_string(),
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Stage::Scan => "Signal detected. Intelligence acquired.",
            Stage::Verify => "Verification complete. Facts corroborated.",
            Stage::Contextualize => "Contextual matrix established.",
            Stage::Write => "Dossier generation complete.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Stage; 4] = [Stage::Scan, Stage::Verify, Stage::Contextualize, Stage::Write];

    #[test]
    fn test_roles_follow_roster_order() {
        let roles: Vec<AgentRole> = ALL.iter().map(|s| s.role()).collect();
        assert_eq!(roles, AgentRole::STAGES.to_vec());
    }

    #[test]
    fn test_search_only_for_discovery() {
        let flags: Vec<bool> = ALL.iter().map(|s| s.uses_search()).collect();
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn test_writer_thinking_text() {
        assert_eq!(
            Stage::Write.thinking_message("anything"),
            "Synthesizing Final Investigative Report..."
        );
    }
}
