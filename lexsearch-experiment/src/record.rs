use crate::error::Result;
use crate::state::SessionSummary;
use chrono::NaiveDateTime;
use lexsearch_core::TrialRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

pub const HEADER: [&str; 4] = [
    "participant_number",
    "target_word",
    "target_word_pos",
    "position_time_pairs",
];

/// Per-participant CSV log, one row per confirmation.
pub struct CsvRecordWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl CsvRecordWriter {
    /// Opens `p{participant}_at_{YYYYmmdd_HHMMSS}.csv` under `results_dir`
    /// and writes the header.
    pub fn create(results_dir: &Path, participant: u32, started: NaiveDateTime) -> Result<Self> {
        std::fs::create_dir_all(results_dir)?;
        let path = results_dir.join(format!("{}.csv", file_stem(participant, started)));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        info!(path = %path.display(), participant, "results file opened");

        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    /// Appends one record and flushes so a crash loses nothing.
    pub fn write(&mut self, record: &TrialRecord) -> Result<()> {
        self.writer.write_record([
            record.participant.to_string(),
            record.target_word.clone(),
            record.target_index.to_string(),
            record.trajectory().to_string(),
        ])?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Summary JSON path sitting next to the CSV.
    pub fn summary_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!("{stem}_summary.json"))
    }
}

pub fn file_stem(participant: u32, started: NaiveDateTime) -> String {
    format!("p{}_at_{}", participant, started.format("%Y%m%d_%H%M%S"))
}

pub fn write_summary(path: &Path, summary: &SessionSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    info!(path = %path.display(), "summary saved");
    Ok(())
}
