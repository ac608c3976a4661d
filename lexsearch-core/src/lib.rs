pub mod error;
pub mod navigation;
pub mod phase;
pub mod trial;
pub mod word_list;

pub use error::Error;
pub use navigation::{Direction, Navigation};
pub use phase::{Phase, StandardPhase};
pub use trial::{Sample, TargetResult, Trajectory, TrialRecord, TrialState, round_centis};
pub use word_list::{Atom, WordList};
