pub mod start;
pub mod stats;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use start::{process_start_command, StartCommand};
use stats::{process_stats_command, StatsCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    session::{slot::JsonFileSlot, store::SessionStore},
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "deepwork", version, long_about = None)]
#[command(about = "Timer for deep work sessions", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME/deepwork or $HOME/.local/state/deepwork"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable verbose logging to the console")]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Start a session. Press Ctrl-C to end it early")]
    Start {
        #[command(flatten)]
        command: StartCommand,
    },
    #[command(about = "Show a calendar of recorded sessions and a summary of one day")]
    Stats {
        #[command(flatten)]
        command: StatsCommand,
    },
    #[command(about = "Remove every recorded session")]
    Clear {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => ensure_dir(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let store = SessionStore::new(JsonFileSlot::new(app_dir)?);

    match args.commands {
        Commands::Start { command } => process_start_command(command, store).await,
        Commands::Stats { command } => process_stats_command(command, store).await,
        Commands::Clear {} => {
            store.clear().await;
            println!("Sessions cleared");
            Ok(())
        }
    }
}
