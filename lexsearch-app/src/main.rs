mod app;
mod cli;
mod input;

use app::App;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "starting"
    );

    let app = App::new(&cli)?;
    app.run()?;

    Ok(())
}
