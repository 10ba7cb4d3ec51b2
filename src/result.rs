use crate::char_log::CharLogRecord;
use crate::metrics::{round_to, Metrics};
use crate::reconciler::CharCounts;
use crate::session::TestSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable summary of a finished test, in the shape handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Net WPM.
    pub wpm: f64,
    /// Gross WPM.
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    /// Comma-joined mode flags.
    pub test_type: String,
    /// Seconds.
    pub duration: u32,
    pub char_logs: Vec<CharLogRecord>,
    pub timestamp: DateTime<Utc>,
    pub chars: CharCounts,
    pub restarts: u32,
}

impl TestResult {
    pub fn from_session(
        session: &TestSession,
        metrics: &Metrics,
        duration: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            wpm: metrics.net_wpm,
            raw_wpm: round_to(metrics.gross_wpm, 2),
            accuracy: metrics.accuracy,
            consistency: metrics.consistency,
            test_type: session.modes.test_type(),
            duration,
            char_logs: session.char_log().flatten(),
            timestamp,
            chars: session.char_counts(),
            restarts: session.restarts,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
