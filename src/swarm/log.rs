use chrono::{DateTime, Utc};

use super::agents::AgentRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Success,
    Error,
    Thinking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub agent: AgentRole,
    pub message: String,
    pub kind: LogKind,
}

/// Append-only activity log for one orchestrator.
///
/// Ids come from a counter that survives `clear()`, so an id is never reused
/// across runs. Timestamps never go backwards even if the wall clock does.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
    next_id: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, agent: AgentRole, message: impl Into<String>, kind: LogKind) -> LogEntry {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);

        self.next_id += 1;
        let entry = LogEntry {
            id: self.next_id,
            timestamp,
            agent,
            message: message.into(),
            kind,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries. Only done when a new run starts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}
