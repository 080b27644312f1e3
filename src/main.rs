use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use studydungeon::core::config::{DungeonConfig, load_config, resolve};

#[derive(Parser)]
#[command(name = "studydungeon", about = "Flashcard study tool for the terminal")]
struct Args {
    /// Directory holding .deck files (overrides config and STUDYDUNGEON_DECK_DIR)
    #[arg(short, long)]
    deck_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.studydungeon/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "studydungeon.log")]
    log_file: PathBuf,

    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(text: &str) -> Result<LevelFilter, String> {
    text.parse().map_err(|_| format!("unknown log level '{text}'"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to a file; the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("StudyDungeon starting up");

    let config = load_config(args.config.as_deref()).unwrap_or_else(|e| {
        log::warn!("Using default config: {}", e);
        DungeonConfig::default()
    });
    let resolved = resolve(&config, args.deck_dir.as_deref());
    log::info!("Deck directory: {}", resolved.deck_dir.display());

    match studydungeon::tui::run(resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {}", e);
            eprintln!("studydungeon: {e}");
            ExitCode::FAILURE
        }
    }
}
