use clap::Parser;
use std::path::PathBuf;

/// Lexical search experiment: find each target word in the dictionary
#[derive(Parser, Debug)]
#[command(name = "lexsearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Participant number (prompted when omitted)
    #[arg(short, long)]
    pub participant: Option<u32>,

    /// CSV file whose first column is the word list
    #[arg(short, long)]
    pub words: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the per-participant CSV logs
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
