use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the current target's trial stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    /// Target shown, timer not started yet.
    AwaitingStart,
    Searching,
    Found,
}

/// One retained point of the navigation trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct Sample {
    /// Cursor index minus target index.
    pub relative_position: i64,
    /// Seconds since the trial started, rounded to 2 decimals.
    pub elapsed_seconds: f64,
}

impl Sample {
    pub fn new(relative_position: i64, elapsed_seconds: f64) -> Self {
        Self {
            relative_position,
            elapsed_seconds: round_centis(elapsed_seconds),
        }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((relative_position, elapsed_seconds): (i64, f64)) -> Self {
        Self::new(relative_position, elapsed_seconds)
    }
}

impl From<Sample> for (i64, f64) {
    fn from(s: Sample) -> Self {
        (s.relative_position, s.elapsed_seconds)
    }
}

pub fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// A sample sequence rendered as `[[rel, secs], [rel, secs]]`.
///
/// The text parses both as JSON and as a Python list literal.
pub struct Trajectory<'a>(pub &'a [Sample]);

impl fmt::Display for Trajectory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{}, {:?}]", s.relative_position, s.elapsed_seconds)?;
        }
        f.write_str("]")
    }
}

/// Row persisted for every confirmation, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub participant: u32,
    pub target_word: String,
    /// -1 when the target is not in the word list.
    pub target_index: i64,
    pub samples: Vec<Sample>,
}

impl TrialRecord {
    pub fn trajectory(&self) -> Trajectory<'_> {
        Trajectory(&self.samples)
    }
}

/// Per-target outcome kept for the end-of-session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetResult {
    pub trial_id: usize,
    pub target_word: String,
    pub target_index: i64,
    pub elapsed_seconds: Option<f64>,
    pub wrong_words: Vec<String>,
    pub sample_count: usize,
}

impl TargetResult {
    pub fn found(&self) -> bool {
        self.elapsed_seconds.is_some()
    }
}
