pub mod config;
pub mod error;
pub mod record;
pub mod sampler;
pub mod state;
pub mod words;
pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use record::{CsvRecordWriter, write_summary};
pub use sampler::{TrajectorySampler, TrialTrack};
pub use state::{SearchStats, SessionEvent, SessionOutcome, SessionStateMachine, SessionSummary};
pub use words::{builtin_word_list, load_word_list};
