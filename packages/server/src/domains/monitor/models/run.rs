use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use extraction::Record;

/// Where a run is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Fetching,
    Extracting,
    Filtering,
    Notifying,
    Persisting,
    Done,
    /// Only reachable from `Fetching`
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fetching => "FETCHING",
            Self::Extracting => "EXTRACTING",
            Self::Filtering => "FILTERING",
            Self::Notifying => "NOTIFYING",
            Self::Persisting => "PERSISTING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

/// Outcome of one orchestration cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub state: RunState,
    pub extracted: usize,
    pub new: usize,
    pub sent: usize,
    /// Records whose notification was delivered
    pub records: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSummary {
    pub fn start(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            state: RunState::Fetching,
            extracted: 0,
            new: 0,
            sent: 0,
            records: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == RunState::Done
    }

    pub(crate) fn advance(&mut self, state: RunState) {
        tracing::debug!(run_id = %self.run_id, from = %self.state, to = %state, "Run state");
        self.state = state;
    }

    pub(crate) fn fail(&mut self, error: impl Into<String>) {
        self.advance(RunState::Failed);
        self.error = Some(error.into());
    }
}

/// Result of a manual check: what the page holds right now, nothing committed.
#[derive(Debug, Clone, Serialize)]
pub struct ManualCheck {
    pub checked_at: DateTime<Utc>,
    pub records: Vec<Record>,
    /// Whether the summary message went out
    pub notified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_screaming() {
        assert_eq!(serde_json::to_string(&RunState::Done).unwrap(), "\"DONE\"");
        assert_eq!(serde_json::to_string(&RunState::Failed).unwrap(), "\"FAILED\"");
        assert_eq!(RunState::Notifying.to_string(), "NOTIFYING");
    }

    #[test]
    fn test_summary_starts_fetching_with_zero_counts() {
        let summary = RunSummary::start(Utc::now());
        assert_eq!(summary.state, RunState::Fetching);
        assert_eq!((summary.extracted, summary.new, summary.sent), (0, 0, 0));
        assert!(!summary.is_success());
        assert_eq!(summary.run_id.get_version_num(), 4);
    }

    #[test]
    fn test_fail_records_error() {
        let mut summary = RunSummary::start(Utc::now());
        summary.fail("connection refused");
        assert_eq!(summary.state, RunState::Failed);
        assert_eq!(summary.error.as_deref(), Some("connection refused"));
    }
}
