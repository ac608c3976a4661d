//! Decides which cursor positions of a search are worth keeping.
//!
//! Two things produce a sample while a trial is active: the cursor leaving
//! a word it rested on for at least the dwell threshold (the sample is for
//! the word being left), and a change of travel direction (the sample is
//! for the word just reached). Both may fire for the same navigation.

use lexsearch_core::{Direction, Sample, WordList};
use lexsearch_timing::Timer;
use std::time::Duration;
use tracing::{debug, warn};

/// State of the trial currently being sampled.
#[derive(Debug, Clone, Default)]
pub struct TrialTrack {
    pub target_word: String,
    /// -1 when the target is absent from the word list.
    pub target_index: i64,
    pub start: Option<u64>,
    pub samples: Vec<Sample>,
    pub cursor: usize,
    pub last_direction: Option<Direction>,
    pub last_position: usize,
    /// When the cursor arrived at its current word.
    pub dwell_since: Option<u64>,
    pub active: bool,
    /// Set by `end_trial`, cleared by the next navigation.
    pub frozen: bool,
}

pub struct TrajectorySampler<T>
where
    T: Timer<Timestamp = u64>,
{
    timer: T,
    len: usize,
    dwell_threshold: Duration,
    trial: TrialTrack,
}

impl<T> TrajectorySampler<T>
where
    T: Timer<Timestamp = u64>,
{
    pub fn new(words: &WordList, timer: T, dwell_threshold: Duration) -> Self {
        Self {
            timer,
            len: words.len(),
            dwell_threshold,
            trial: TrialTrack::default(),
        }
    }

    pub fn begin_trial(&mut self, target_word: &str, words: &WordList) {
        let now = self.timer.now();
        let target_index = words.position_of(target_word);
        if target_index < 0 {
            warn!(target = target_word, "target word is not in the word list");
        }

        self.len = words.len();
        let cursor = self.trial.cursor.min(self.len - 1);
        self.trial = TrialTrack {
            target_word: target_word.to_string(),
            target_index,
            start: Some(now),
            samples: Vec::new(),
            cursor,
            last_direction: None,
            last_position: cursor,
            dwell_since: Some(now),
            active: true,
            frozen: false,
        };
        debug!(target = target_word, target_index, cursor, "trial begun");
    }

    /// Applies a cursor change and returns the (clamped) new cursor.
    pub fn on_navigate(&mut self, requested: i64, trial_active: bool) -> usize {
        let now = self.timer.now();
        self.trial.frozen = false;
        self.check_dwell(now, trial_active);

        let previous = self.trial.cursor;
        let Some(direction) = Direction::between(previous as i64, requested) else {
            return previous;
        };

        let next = requested.clamp(0, self.len as i64 - 1) as usize;
        self.trial.cursor = next;
        if trial_active
            && self
                .trial
                .last_direction
                .is_some_and(|last| last != direction)
        {
            self.push_sample(next, now, "reversal");
        }

        self.trial.last_direction = Some(direction);
        self.trial.last_position = next;
        next
    }

    /// Captures the dwell on the final word and returns the samples.
    ///
    /// Repeated calls without navigation in between return the same
    /// sequence.
    pub fn end_trial(&mut self) -> &[Sample] {
        if !self.trial.frozen {
            let now = self.timer.now();
            self.check_dwell(now, self.trial.active);
            self.trial.frozen = true;
        }
        &self.trial.samples
    }

    /// Moves the cursor without sampling, e.g. back to the first word when
    /// a new target is shown.
    pub fn place_cursor(&mut self, index: i64) {
        let cursor = index.clamp(0, self.len as i64 - 1) as usize;
        self.trial.cursor = cursor;
        self.trial.last_position = cursor;
        self.trial.last_direction = None;
        self.trial.dwell_since = Some(self.timer.now());
    }

    /// Stops sampling until the next `begin_trial`.
    pub fn deactivate(&mut self) {
        self.trial.active = false;
    }

    pub fn cursor(&self) -> usize {
        self.trial.cursor
    }

    pub fn target_index(&self) -> i64 {
        self.trial.target_index
    }

    pub fn samples(&self) -> &[Sample] {
        &self.trial.samples
    }

    pub fn trial(&self) -> &TrialTrack {
        &self.trial
    }

    fn check_dwell(&mut self, now: u64, trial_active: bool) {
        if let Some(since) = self.trial.dwell_since {
            let dwell = Duration::from_nanos(now.saturating_sub(since));
            if trial_active && dwell >= self.dwell_threshold {
                self.push_sample(self.trial.cursor, now, "dwell");
            }
        }
        self.trial.dwell_since = Some(now);
    }

    fn push_sample(&mut self, index: usize, now: u64, reason: &'static str) {
        let Some(start) = self.trial.start else {
            return;
        };
        let elapsed = Duration::from_nanos(now.saturating_sub(start)).as_secs_f64();
        let sample = Sample::new(index as i64 - self.trial.target_index, elapsed);
        debug!(
            reason,
            index,
            relative = sample.relative_position,
            elapsed = sample.elapsed_seconds,
            "sample"
        );
        self.trial.samples.push(sample);
    }
}
