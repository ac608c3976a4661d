use crate::cli::Cli;
use crate::input::{Command, HELP, parse_command};
use anyhow::{Context, Result, bail};
use lexsearch_core::{Phase, StandardPhase, TrialRecord, WordList};
use lexsearch_experiment::{
    CsvRecordWriter, ExperimentConfig, SessionEvent, SessionOutcome, SessionStateMachine,
    builtin_word_list, load_word_list, write_summary,
};
use lexsearch_timing::HighPrecisionTimer;
use rand::rngs::ThreadRng;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

pub struct App {
    experiment: SessionStateMachine<StandardPhase, HighPrecisionTimer, ThreadRng>,
    writer: Option<CsvRecordWriter>,
    pending_participant: Option<u32>,
    last_navigation: Option<SessionEvent>,
    should_exit: bool,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ExperimentConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(dir) = &cli.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(words) = &cli.words {
            config.word_list = Some(words.clone());
        }
        config.validate()?;

        let words = match &config.word_list {
            Some(path) => load_word_list(path)
                .with_context(|| format!("Failed to load word list: {}", path.display()))?,
            None => builtin_word_list(),
        };

        Ok(Self::from_config(config, words, cli.participant))
    }

    pub fn from_config(config: ExperimentConfig, words: WordList, participant: Option<u32>) -> Self {
        let timer = HighPrecisionTimer::new();
        let rng = rand::rng();
        Self {
            experiment: SessionStateMachine::new(config, words, timer, rng),
            writer: None,
            pending_participant: participant,
            last_navigation: None,
            should_exit: false,
        }
    }

    pub fn run(self) -> Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    pub fn run_with<I: BufRead, O: Write>(mut self, input: I, mut out: O) -> Result<()> {
        writeln!(out, "=== LEXICAL SEARCH EXPERIMENT ===")?;
        writeln!(out, "Dictionary: {} words", self.experiment.words.len())?;
        writeln!(out, "Type ? for the list of commands.\n")?;

        let mut lines = input.lines();
        while !self.should_exit {
            if !self.experiment.current_phase().is_search() {
                let Some(participant) = self.next_participant(&mut lines, &mut out)? else {
                    break;
                };
                self.start_participant(participant, &mut out)?;
                continue;
            }

            let Some(line) = lines.next().transpose()? else {
                break;
            };
            match parse_command(&line) {
                Some(Command::Session(event)) => self.dispatch(event, &mut out)?,
                Some(Command::Repeat) => {
                    if let Some(event) = self.last_navigation.clone() {
                        self.dispatch(event, &mut out)?;
                    }
                }
                Some(Command::Help) => writeln!(out, "{HELP}")?,
                Some(Command::Quit) => self.should_exit = true,
                None => writeln!(out, "Unknown command, type ? for help.")?,
            }
        }

        self.cleanup_and_exit(&mut out)
    }

    fn next_participant<L, O>(&mut self, lines: &mut L, out: &mut O) -> Result<Option<u32>>
    where
        L: Iterator<Item = io::Result<String>>,
        O: Write,
    {
        if let Some(participant) = self.pending_participant.take() {
            return Ok(Some(participant));
        }
        loop {
            writeln!(out, "Participant number (empty to quit):")?;
            let Some(line) = lines.next().transpose()? else {
                return Ok(None);
            };
            let line = line.trim();
            if line.is_empty() || line == "q" {
                return Ok(None);
            }
            match line.parse::<u32>() {
                Ok(participant) => return Ok(Some(participant)),
                Err(_) => writeln!(out, "⚠ Enter a valid number!")?,
            }
        }
    }

    fn start_participant<O: Write>(&mut self, participant: u32, out: &mut O) -> Result<()> {
        if !self.experiment.start_participant(participant) {
            bail!("participant {participant} cannot start during a search");
        }

        let started = chrono::Local::now().naive_local();
        let writer =
            CsvRecordWriter::create(&self.experiment.config.results_dir, participant, started)
                .context("Failed to create results file")?;
        writeln!(out, "Logging to {}", writer.path().display())?;
        self.writer = Some(writer);
        self.last_navigation = None;

        self.show_target(out)
    }

    fn dispatch<O: Write>(&mut self, event: SessionEvent, out: &mut O) -> Result<()> {
        if matches!(event, SessionEvent::Navigate(_)) {
            self.last_navigation = Some(event.clone());
        }

        match self.experiment.handle_event(event) {
            SessionOutcome::Moved { index, word } => writeln!(out, "[{index}] {word}")?,
            SessionOutcome::TimerStarted { target } => {
                writeln!(out, "⏱ Searching for « {target} »...")?
            }
            SessionOutcome::NotStarted => {
                writeln!(out, "⚠ Press 's' to start the timer first.")?
            }
            SessionOutcome::WrongWord { record, confirmed } => {
                self.persist(&record)?;
                writeln!(out, "⚠ Wrong word: {confirmed} (the clock keeps running)")?;
            }
            SessionOutcome::Found {
                record,
                elapsed_seconds,
                next_target,
            } => {
                self.persist(&record)?;
                writeln!(out, "✅ Word found in {elapsed_seconds} s.")?;
                self.last_navigation = None;
                match next_target {
                    Some(_) => self.show_target(out)?,
                    None => self.finish_participant(out)?,
                }
            }
            SessionOutcome::Ignored => {}
        }
        Ok(())
    }

    fn show_target<O: Write>(&mut self, out: &mut O) -> Result<()> {
        let Some(target) = self.experiment.current_target() else {
            return Ok(());
        };
        if let Some((n, total)) = self.experiment.target_progress() {
            writeln!(out, "\n🔍 Find the word ({n}/{total}): « {target} »")?;
        }
        writeln!(
            out,
            "[{}] {}",
            self.experiment.cursor(),
            self.experiment.current_word()
        )?;
        Ok(())
    }

    fn persist(&mut self, record: &TrialRecord) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .write(record)
                .context("Failed to write trial record")?;
        }
        Ok(())
    }

    fn finish_participant<O: Write>(&mut self, out: &mut O) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let summary = self.experiment.summary();
        write_summary(&writer.summary_path(), &summary).context("Failed to write summary")?;

        writeln!(out, "\n🎉 Experiment complete!")?;
        if let Some(stats) = &summary.stats {
            writeln!(
                out,
                "Found {} words: mean {:.2} s, min {:.2} s, max {:.2} s, {} wrong confirmations",
                stats.found,
                stats.mean_seconds,
                stats.min_seconds,
                stats.max_seconds,
                stats.wrong_confirmations
            )?;
        }
        writeln!(
            out,
            "{} rows saved to {}",
            writer.rows(),
            writer.path().display()
        )?;
        Ok(())
    }

    fn cleanup_and_exit<O: Write>(&mut self, out: &mut O) -> Result<()> {
        if self.writer.is_some() {
            warn!("leaving before every target was found");
            self.finish_participant(out)?;
        }
        info!("session closed");
        writeln!(out, "Results saved. Thank you!")?;
        Ok(())
    }
}
