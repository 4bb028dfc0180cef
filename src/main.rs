use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use placeboard::config::{BoardConfig, ConfigError};
use placeboard::engine::BoardCore;
use placeboard::grid;
use placeboard::script::{self, Runner, ScriptError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read script: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "placeboard", about = "Placement board replay and layout tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON step script and print one outcome per line.
    Replay {
        /// Script file; reads stdin when omitted or `-`.
        script: Option<PathBuf>,
    },
    /// Print the anchor grid laid out for a canvas size.
    Layout {
        #[arg(long, env = "PLACEBOARD_CANVAS_WIDTH", default_value_t = 1000.0)]
        width: f64,
        #[arg(long, env = "PLACEBOARD_CANVAS_HEIGHT", default_value_t = 800.0)]
        height: f64,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = BoardConfig::from_env()?;

    match cli.command {
        Command::Replay { script } => replay(config, script),
        Command::Layout { width, height } => {
            let layout = grid::layout(width, height, config.grid);
            println!("{}", serde_json::to_string_pretty(&layout)?);
            Ok(())
        }
    }
}

fn replay(config: BoardConfig, path: Option<PathBuf>) -> Result<(), CliError> {
    let source = match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let steps = script::parse(&source)?;
    let mut runner = Runner::new(BoardCore::new(config));
    for outcome in runner.run(&steps)? {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    tracing::info!(steps = steps.len(), spawned = runner.spawned().len(), "replay finished");
    Ok(())
}
