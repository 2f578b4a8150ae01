//! Plain-text formatting for Discord replies.

use std::fmt::Write;

use crate::llm::Source;
use crate::swarm::agents::AgentRole;
use crate::swarm::log::{LogEntry, LogKind};
use crate::swarm::sources::dedup_by_uri;
use crate::swarm::RunState;

/// Discord rejects messages over 2000 chars; keep a little headroom.
pub const MAX_MESSAGE_LEN: usize = 1990;

/// How many log lines the live progress message shows.
pub const PROGRESS_TAIL: usize = 12;

fn kind_marker(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Info => "▸",
        LogKind::Success => "✅",
        LogKind::Error => "❌",
        LogKind::Thinking => "⏳",
    }
}

pub fn format_log_line(entry: &LogEntry) -> String {
    format!(
        "`{}` {} **{}** {}",
        entry.timestamp.format("%H:%M:%S"),
        kind_marker(entry.kind),
        entry.agent,
        entry.message
    )
}

pub fn format_log(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(format_log_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The live status message edited while a run is in flight.
pub fn format_progress(state: &RunState) -> String {
    let profile = state.current_agent.profile();
    let mut out = String::new();
    if let Some(topic) = &state.topic {
        let _ = writeln!(out, "**Investigation:** {}", topic);
    }
    let _ = writeln!(
        out,
        "{} **{}**: {}\n",
        profile.icon, profile.name, state.status_message
    );
    out.push_str(&format_log(state.log.tail(PROGRESS_TAIL)));
    truncate(&out, MAX_MESSAGE_LEN)
}

pub fn format_status(state: &RunState, model: &str) -> String {
    let mut out = String::from("**Swarm status**\n");
    let _ = writeln!(
        out,
        "Running: {} | Model: `{}`",
        if state.is_running { "yes" } else { "no" },
        model
    );
    if let Some(topic) = &state.topic {
        let _ = writeln!(out, "Last topic: {}", topic);
    }
    let _ = writeln!(out, "Status: {}\n", state.status_message);
    for role in AgentRole::STAGES {
        let profile = role.profile();
        let marker = if state.current_agent == role { "▶" } else { "·" };
        let _ = writeln!(out, "{} {} **{}**", marker, profile.icon, profile.name);
    }
    out
}

pub fn format_roster() -> String {
    let mut out = String::from("**Agents**\n");
    for role in AgentRole::STAGES.into_iter().chain([AgentRole::Idle]) {
        let profile = role.profile();
        let _ = writeln!(
            out,
            "{} **{}**: {}",
            profile.icon, profile.name, profile.description
        );
    }
    out
}

/// Deduplicated markdown link list, or an empty string when there is nothing to cite.
pub fn format_sources(sources: &[Source]) -> String {
    let unique = dedup_by_uri(sources);
    if unique.is_empty() {
        return String::new();
    }
    let mut out = format!("**Sources ({}):**\n", unique.len());
    for source in &unique {
        let _ = writeln!(out, "- [{}](<{}>)", source.title, source.uri);
    }
    out
}

/// Cut at a char boundary and mark the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let marker = "\n…";
    let mut end = max.saturating_sub(marker.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &text[..end], marker)
}

/// Split text into pieces of at most `max` bytes, preferring newline then
/// space boundaries and never cutting through a UTF-8 character.
pub fn split_chunks(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        if remaining.len() <= max {
            chunks.push(remaining);
            break;
        }
        let mut limit = max;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }
        let window = &remaining[..limit];
        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .map(|i| i + 1)
            .unwrap_or(limit);
        let split_at = if split_at == 0 {
            // A single character wider than `max`; emit it whole.
            remaining.chars().next().map_or(remaining.len(), |c| c.len_utf8())
        } else {
            split_at
        };
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swarm::log::ActivityLog;

    #[test]
    fn test_split_prefers_newlines() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_chunks(text, 10), vec!["aaaa\nbbbb\n", "cccc"]);
    }

    #[test]
    fn test_split_falls_back_to_spaces_then_hard_cut() {
        assert_eq!(split_chunks("aaa bbb ccc", 8), vec!["aaa bbb ", "ccc"]);
        assert_eq!(split_chunks("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_respects_limit_and_utf8() {
        let text = "é".repeat(3000) + "\n" + &"word ".repeat(900);
        let chunks = split_chunks(&text, MAX_MESSAGE_LEN);
        assert!(chunks.iter().all(|c| c.len() <= MAX_MESSAGE_LEN));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_chunks("", 10).is_empty());
    }

    #[test]
    fn test_sources_deduplicated() {
        let sources = vec![
            Source {
                title: "A".to_string(),
                uri: "https://a".to_string(),
            },
            Source {
                title: "A dup".to_string(),
                uri: "https://a".to_string(),
            },
        ];
        let out = format_sources(&sources);
        assert!(out.starts_with("**Sources (1):**"));
        assert!(out.contains("- [A](<https://a>)"));
        assert!(!out.contains("A dup"));
        assert!(format_sources(&[]).is_empty());
    }

    #[test]
    fn test_progress_fits_discord() {
        let mut state = RunState::default();
        state.topic = Some("Port strike".to_string());
        let mut log = ActivityLog::new();
        for _ in 0..40 {
            log.append(AgentRole::Scanner, "x".repeat(300), LogKind::Thinking);
        }
        state.log = log;
        let out = format_progress(&state);
        assert!(out.len() <= MAX_MESSAGE_LEN);
        assert!(out.starts_with("**Investigation:** Port strike"));
    }

    #[test]
    fn test_log_line() {
        let mut log = ActivityLog::new();
        let entry = log.append(AgentRole::Verifier, "checking", LogKind::Success);
        let line = format_log_line(&entry);
        assert!(line.contains("**Verifier** checking"));
        assert!(line.contains("✅"));
    }

    #[test]
    fn test_roster_lists_all_roles() {
        let roster = format_roster();
        for name in ["Scanner", "Verifier", "Contextualizer", "Writer", "Orchestrator"] {
            assert!(roster.contains(name));
        }
    }
}
