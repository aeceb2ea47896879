use clap::Parser;
use log::{error, info};

use calnotes::{App, Cli, Config, NoteStore, Result, Settings};

/// Sets up env_logger. RUST_LOG still overrides the default filter, which is
/// kept at `warn` so command output stays clean unless --verbose is given.
fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

async fn run(cli: Cli) -> Result<()> {
    info!("Application starting up");

    let config = Config::resolve(cli.data_dir)?;
    let settings = Settings::load(&config);
    let store = NoteStore::load(config)?;

    let mut app = App::new(store, settings, cli.verbose);
    app.run(cli.command).await?;

    info!("Application shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
