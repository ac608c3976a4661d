use super::config::ExperimentConfig;
use super::sampler::TrajectorySampler;
use lexsearch_core::{
    Navigation, Phase, TargetResult, TrialRecord, TrialState, WordList, round_centis,
};
use lexsearch_timing::Timer;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Input forwarded by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Navigate(Navigation),
    StartTimer,
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Moved {
        index: usize,
        word: String,
    },
    TimerStarted {
        target: String,
    },
    /// Confirm pressed before the timer was started.
    NotStarted,
    WrongWord {
        record: TrialRecord,
        confirmed: String,
    },
    Found {
        record: TrialRecord,
        elapsed_seconds: f64,
        /// `None` once every target has been found.
        next_target: Option<String>,
    },
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub found: usize,
    pub mean_seconds: f64,
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub wrong_confirmations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub participant: u32,
    pub results: Vec<TargetResult>,
    pub stats: Option<SearchStats>,
}

/// Current target and its bookkeeping.
#[derive(Debug, Clone)]
struct TargetTrial {
    id: usize,
    word: String,
    state: TrialState,
    started_at: Option<u64>,
    wrong_words: Vec<String>,
}

pub struct SessionStateMachine<P, T, R>
where
    P: Phase,
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub phase: P,
    pub timer: T,
    pub rng: R,
    pub config: ExperimentConfig,
    pub words: WordList,
    pub sampler: TrajectorySampler<T>,
    pub participant: Option<u32>,
    pub targets: Vec<String>,
    current: Option<TargetTrial>,
    pub target_number: usize,
    pub results: Vec<TargetResult>,
}

impl<P, T, R> SessionStateMachine<P, T, R>
where
    P: Phase,
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(config: ExperimentConfig, words: WordList, timer: T, rng: R) -> Self {
        let sampler = TrajectorySampler::new(&words, timer.clone(), config.dwell_threshold());
        Self {
            phase: P::default(),
            timer,
            rng,
            config,
            words,
            sampler,
            participant: None,
            targets: Vec::new(),
            current: None,
            target_number: 0,
            results: Vec::new(),
        }
    }

    /// Shuffles the targets for a new participant and shows the first one.
    ///
    /// Allowed from setup and from the debrief of the previous participant.
    pub fn start_participant(&mut self, participant: u32) -> bool {
        if self.phase.is_search() {
            return false;
        }
        if self.phase.is_debrief() && !self.advance_phase() {
            return false;
        }

        self.participant = Some(participant);
        self.targets = self.config.target_words.clone();
        self.targets.shuffle(&mut self.rng);
        self.results.clear();
        self.target_number = 0;

        let missing: Vec<&str> = self
            .targets
            .iter()
            .filter(|t| !self.words.contains(t))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            warn!(?missing, "some targets are absent from the word list");
        }

        info!(participant, targets = ?self.targets, "participant started");
        self.advance_phase();
        self.load_target();
        true
    }

    pub fn advance_phase(&mut self) -> bool {
        if let Some(next) = self.phase.next() {
            self.phase = next;
            true
        } else {
            false
        }
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> SessionOutcome {
        if !self.phase.allows_navigation() || self.current.is_none() {
            return SessionOutcome::Ignored;
        }
        match event {
            SessionEvent::Navigate(nav) => self.navigate(nav),
            SessionEvent::StartTimer => self.start_timer(),
            SessionEvent::Confirm => self.confirm(),
        }
    }

    fn navigate(&mut self, nav: Navigation) -> SessionOutcome {
        let active = self.is_searching();
        let requested = nav.requested_index(self.sampler.cursor());
        let index = self.sampler.on_navigate(requested, active);
        SessionOutcome::Moved {
            index,
            word: self.words.word_at(index as i64).to_string(),
        }
    }

    fn start_timer(&mut self) -> SessionOutcome {
        let Some(trial) = self.current.as_mut() else {
            return SessionOutcome::Ignored;
        };
        let now = self.timer.now();
        trial.started_at = Some(now);
        trial.state = TrialState::Searching;
        let target = trial.word.clone();

        self.sampler.begin_trial(&target, &self.words);
        info!(trial = trial.id, target = %target, "timer started");
        SessionOutcome::TimerStarted { target }
    }

    fn confirm(&mut self) -> SessionOutcome {
        let participant = self.participant.unwrap_or_default();
        let Some(trial) = self.current.as_mut() else {
            return SessionOutcome::Ignored;
        };
        let Some(started_at) = trial.started_at else {
            warn!(target = %trial.word, "confirm before the timer was started");
            return SessionOutcome::NotStarted;
        };

        let samples = self.sampler.end_trial().to_vec();
        let record = TrialRecord {
            participant,
            target_word: trial.word.clone(),
            target_index: self.sampler.target_index(),
            samples,
        };

        let confirmed = self.words.word_at(self.sampler.cursor() as i64).to_string();
        if confirmed != trial.word {
            info!(target = %trial.word, confirmed = %confirmed, "wrong word, clock keeps running");
            trial.wrong_words.push(confirmed.clone());
            return SessionOutcome::WrongWord { record, confirmed };
        }

        let elapsed_seconds = round_centis(self.timer.elapsed(started_at).as_secs_f64());
        trial.state = TrialState::Found;
        info!(
            trial = trial.id,
            target = %trial.word,
            elapsed_seconds,
            samples = record.samples.len(),
            "word found"
        );
        self.results.push(TargetResult {
            trial_id: trial.id,
            target_word: trial.word.clone(),
            target_index: record.target_index,
            elapsed_seconds: Some(elapsed_seconds),
            wrong_words: std::mem::take(&mut trial.wrong_words),
            sample_count: record.samples.len(),
        });

        self.complete_current_target();
        SessionOutcome::Found {
            record,
            elapsed_seconds,
            next_target: self.current_target().map(str::to_string),
        }
    }

    fn complete_current_target(&mut self) {
        self.sampler.deactivate();
        self.current = None;
        self.target_number += 1;

        self.timer.sleep(self.config.inter_trial_interval());
        self.load_target();
    }

    fn load_target(&mut self) {
        if self.target_number >= self.targets.len() {
            info!(
                participant = self.participant.unwrap_or_default(),
                found = self.results.len(),
                "all targets done"
            );
            self.current = None;
            self.advance_phase();
            return;
        }

        let word = self.targets[self.target_number].clone();
        self.sampler.place_cursor(0);
        self.current = Some(TargetTrial {
            id: self.target_number,
            word,
            state: TrialState::AwaitingStart,
            started_at: None,
            wrong_words: Vec::new(),
        });
    }

    /// Found targets plus, while a search is unfinished, the current target
    /// with no elapsed time.
    pub fn results_so_far(&self) -> Vec<TargetResult> {
        let mut results = self.results.clone();
        let pending = self
            .current
            .as_ref()
            .filter(|t| t.started_at.is_some() || !t.wrong_words.is_empty());
        if let Some(trial) = pending {
            results.push(TargetResult {
                trial_id: trial.id,
                target_word: trial.word.clone(),
                target_index: self.words.position_of(&trial.word),
                elapsed_seconds: None,
                wrong_words: trial.wrong_words.clone(),
                sample_count: self.sampler.samples().len(),
            });
        }
        results
    }

    /// Search-time statistics over the targets found so far. Wrong
    /// confirmations also count those made on an unfinished target.
    pub fn analyze_results(&self) -> Option<SearchStats> {
        Self::stats_for(&self.results_so_far())
    }

    fn stats_for(results: &[TargetResult]) -> Option<SearchStats> {
        let times: Vec<f64> = results
            .iter()
            .filter(|r| r.found())
            .filter_map(|r| r.elapsed_seconds)
            .collect();
        if times.is_empty() {
            return None;
        }

        let mean = times.iter().sum::<f64>() / times.len() as f64;
        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let wrong: usize = results.iter().map(|r| r.wrong_words.len()).sum();

        info!(
            found = times.len(),
            mean_seconds = round_centis(mean),
            min_seconds = min,
            max_seconds = max,
            wrong_confirmations = wrong,
            "search times"
        );
        Some(SearchStats {
            found: times.len(),
            mean_seconds: round_centis(mean),
            min_seconds: min,
            max_seconds: max,
            wrong_confirmations: wrong,
        })
    }

    pub fn summary(&self) -> SessionSummary {
        let results = self.results_so_far();
        let stats = Self::stats_for(&results);
        SessionSummary {
            participant: self.participant.unwrap_or_default(),
            results,
            stats,
        }
    }

    pub fn current_phase(&self) -> &P {
        &self.phase
    }

    pub fn current_target(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.word.as_str())
    }

    pub fn current_trial_state(&self) -> Option<TrialState> {
        self.current.as_ref().map(|t| t.state)
    }

    pub fn is_searching(&self) -> bool {
        self.current_trial_state() == Some(TrialState::Searching)
    }

    pub fn cursor(&self) -> usize {
        self.sampler.cursor()
    }

    pub fn current_word(&self) -> &str {
        self.words.word_at(self.sampler.cursor() as i64)
    }

    /// Time since the timer was started for the current target.
    pub fn search_time(&self) -> Option<Duration> {
        self.current
            .as_ref()
            .and_then(|t| t.started_at)
            .map(|s| self.timer.elapsed(s))
    }

    pub fn target_progress(&self) -> Option<(usize, usize)> {
        self.current
            .as_ref()
            .map(|_| (self.target_number + 1, self.targets.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::builtin_word_list;
    use lexsearch_core::{Sample, StandardPhase};
    use lexsearch_timing::ManualTimer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    type Session = SessionStateMachine<StandardPhase, ManualTimer, StdRng>;

    fn session(targets: &[&str]) -> (Session, ManualTimer) {
        let config = ExperimentConfig {
            target_words: targets.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        let timer = ManualTimer::new();
        let s = Session::new(config, builtin_word_list(), timer.clone(), StdRng::seed_from_u64(7));
        (s, timer)
    }

    #[test]
    fn events_are_ignored_before_a_participant() {
        let (mut s, _) = session(&["amour"]);
        assert_eq!(s.handle_event(SessionEvent::StartTimer), SessionOutcome::Ignored);
        assert_eq!(
            s.handle_event(SessionEvent::Navigate(Navigation::StepRight)),
            SessionOutcome::Ignored
        );
    }

    #[test]
    fn confirm_before_start_is_a_warning() {
        let (mut s, _) = session(&["amour"]);
        assert!(s.start_participant(4));
        assert_eq!(s.handle_event(SessionEvent::Confirm), SessionOutcome::NotStarted);
        assert_eq!(s.current_trial_state(), Some(TrialState::AwaitingStart));
    }

    #[test]
    fn browsing_before_start_moves_without_sampling() {
        let (mut s, timer) = session(&["abeille"]);
        s.start_participant(1);
        timer.advance_ms(2000);
        let out = s.handle_event(SessionEvent::Navigate(Navigation::StepRight));
        assert_eq!(
            out,
            SessionOutcome::Moved {
                index: 1,
                word: "abandon".into()
            }
        );
        assert!(s.sampler.samples().is_empty());
    }

    #[test]
    fn wrong_word_keeps_clock_running_then_found_advances() {
        let (mut s, timer) = session(&["abeille"]);
        s.start_participant(9);
        s.handle_event(SessionEvent::StartTimer);

        s.handle_event(SessionEvent::Navigate(Navigation::JumpTo(4)));
        timer.advance_ms(1200);
        let SessionOutcome::WrongWord { record, confirmed } =
            s.handle_event(SessionEvent::Confirm)
        else {
            panic!("expected a wrong word");
        };
        assert_eq!(confirmed, "abolir");
        assert_eq!(record.participant, 9);
        assert_eq!(record.target_index, 3);
        assert_eq!(record.samples, vec![Sample::new(1, 1.2)]);
        assert!(s.is_searching());

        timer.advance_ms(300);
        s.handle_event(SessionEvent::Navigate(Navigation::StepLeft));
        let SessionOutcome::Found {
            record,
            elapsed_seconds,
            next_target,
        } = s.handle_event(SessionEvent::Confirm)
        else {
            panic!("expected the target to be found");
        };
        assert_eq!(elapsed_seconds, 1.5);
        assert_eq!(next_target, None);
        assert_eq!(
            record.samples,
            vec![Sample::new(1, 1.2), Sample::new(0, 1.5)]
        );
        assert!(s.current_phase().is_debrief());

        let summary = s.summary();
        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].wrong_words, vec!["abolir"]);
        let stats = summary.stats.unwrap();
        assert_eq!(stats.found, 1);
        assert_eq!(stats.wrong_confirmations, 1);
    }

    #[test]
    fn found_target_resets_cursor_and_pauses() {
        let (mut s, timer) = session(&["abaisser", "abandon"]);
        s.start_participant(2);
        let first = s.current_target().unwrap().to_string();
        let first_index = s.words.position_of(&first);

        s.handle_event(SessionEvent::StartTimer);
        s.handle_event(SessionEvent::Navigate(Navigation::JumpTo(first_index)));
        let before = timer.now();
        let out = s.handle_event(SessionEvent::Confirm);
        assert!(matches!(out, SessionOutcome::Found { next_target: Some(_), .. }));
        assert_eq!(timer.elapsed(before), Duration::from_secs(1));

        assert_eq!(s.cursor(), 0);
        assert_eq!(s.current_trial_state(), Some(TrialState::AwaitingStart));
        assert_eq!(s.target_progress(), Some((2, 2)));
        assert_ne!(s.current_target(), Some(first.as_str()));
    }

    #[test]
    fn targets_are_a_permutation_of_config() {
        let targets = ["abandon", "abeille", "acheter", "amour", "article"];
        let (mut s, _) = session(&targets);
        s.start_participant(1);
        let mut shuffled = s.targets.clone();
        shuffled.sort();
        assert_eq!(shuffled, targets.to_vec());
    }

    #[test]
    fn next_participant_starts_from_debrief() {
        let (mut s, _) = session(&["abaisser"]);
        s.start_participant(1);
        assert!(!s.start_participant(2));

        s.handle_event(SessionEvent::StartTimer);
        s.handle_event(SessionEvent::Confirm);
        assert!(s.current_phase().is_debrief());
        assert_eq!(s.handle_event(SessionEvent::Confirm), SessionOutcome::Ignored);

        assert!(s.start_participant(2));
        assert!(s.current_phase().is_search());
        assert!(s.results.is_empty());
        assert_eq!(s.participant, Some(2));
    }

    #[test]
    fn restarting_the_timer_discards_samples() {
        let (mut s, timer) = session(&["amour"]);
        s.start_participant(1);
        s.handle_event(SessionEvent::StartTimer);
        timer.advance_ms(1500);
        s.handle_event(SessionEvent::Navigate(Navigation::StepRight));
        assert_eq!(s.sampler.samples().len(), 1);

        s.handle_event(SessionEvent::StartTimer);
        assert!(s.sampler.samples().is_empty());
        assert_eq!(s.search_time(), Some(Duration::ZERO));
    }

    #[test]
    fn absent_target_can_still_be_recorded() {
        let (mut s, timer) = session(&["perdu"]);
        s.start_participant(5);
        s.handle_event(SessionEvent::StartTimer);
        timer.advance_ms(1000);
        let SessionOutcome::WrongWord { record, .. } = s.handle_event(SessionEvent::Confirm) else {
            panic!("an absent target can never be found");
        };
        assert_eq!(record.target_index, -1);
        assert_eq!(record.samples, vec![Sample::new(1, 1.0)]);
    }

    #[test]
    fn unfinished_target_is_kept_in_the_summary() {
        let (mut s, timer) = session(&["abeille"]);
        s.start_participant(6);
        s.handle_event(SessionEvent::StartTimer);
        s.handle_event(SessionEvent::Navigate(Navigation::JumpTo(10)));
        timer.advance_ms(1200);
        assert!(matches!(
            s.handle_event(SessionEvent::Confirm),
            SessionOutcome::WrongWord { .. }
        ));

        let summary = s.summary();
        assert_eq!(summary.results.len(), 1);
        let pending = &summary.results[0];
        assert!(!pending.found());
        assert_eq!(pending.target_word, "abeille");
        assert_eq!(pending.target_index, 3);
        assert_eq!(pending.wrong_words.len(), 1);
        assert_eq!(pending.sample_count, 1);
        assert_eq!(summary.stats, None);
    }

    #[test]
    fn wrong_words_survive_a_timer_restart() {
        let (mut s, _) = session(&["abeille"]);
        s.start_participant(6);
        s.handle_event(SessionEvent::StartTimer);
        s.handle_event(SessionEvent::Navigate(Navigation::JumpTo(10)));
        s.handle_event(SessionEvent::Confirm);

        s.handle_event(SessionEvent::StartTimer);
        s.handle_event(SessionEvent::Navigate(Navigation::JumpTo(3)));
        assert!(matches!(
            s.handle_event(SessionEvent::Confirm),
            SessionOutcome::Found { .. }
        ));

        let summary = s.summary();
        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].wrong_words.len(), 1);
        assert_eq!(summary.stats.unwrap().wrong_confirmations, 1);
    }

    #[test]
    fn untouched_target_is_not_reported() {
        let (mut s, _) = session(&["amour"]);
        s.start_participant(1);
        assert!(s.summary().results.is_empty());
    }

    #[test]
    fn no_stats_without_found_targets() {
        let (s, _) = session(&["amour"]);
        assert_eq!(s.analyze_results(), None);
    }
}
