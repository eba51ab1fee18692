use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use viewer_cursor_tools::{Config, CursorTool, replay::Replayer};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CURSOR_TOOLS_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "cursor-tools")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Cursor tool controller for document viewers"
)]
struct Cli {
    /// Tool activated once loading settles (select, hand, or zoom)
    #[arg(long, short = 't', value_name = "TOOL", value_parser = parse_tool)]
    tool: Option<CursorTool>,

    /// Config file to use instead of ~/.config/viewer-cursor-tools/config.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input script to replay (reads stdin when omitted)
    #[arg(long, short = 's', value_name = "PATH")]
    script: Option<PathBuf>,
}

fn parse_tool(value: &str) -> Result<CursorTool, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let stdout = io::stdout();
    let mut replayer = Replayer::new(&config, cli.tool, stdout.lock())?;

    match &cli.script {
        Some(path) => {
            log::info!("Replaying {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            replayer.run(BufReader::new(file))?;
        }
        None => {
            log::info!("Replaying commands from stdin");
            replayer.run(io::stdin().lock())?;
        }
    }

    log::debug!("Final state: {:?}", replayer.controller());
    Ok(())
}
