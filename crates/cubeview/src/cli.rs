use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cubeview",
    author,
    version,
    about = "Spinning-cube 3D viewer",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Read configuration from FILE instead of the default `cubeview.toml`.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Initial window size (e.g. `640x520`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_window_size)]
    pub size: Option<(u32, u32)>,

    /// Open the window with the rotation paused.
    #[arg(long)]
    pub paused: bool,

    /// Degrees the cube turns per tick.
    #[arg(long, value_name = "DEGREES")]
    pub step: Option<f32>,

    /// Delay between ticks (`33ms`, `0.5s` or plain milliseconds).
    #[arg(long, value_name = "DURATION", value_parser = viewconfig::parse_interval)]
    pub interval: Option<Duration>,

    /// Window title shown before the status text.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Depth buffer precision in bits (16, 24 or 32).
    #[arg(long, value_name = "BITS")]
    pub depth_bits: Option<u8>,

    /// Request a single-buffered drawable.
    #[arg(long)]
    pub single_buffer: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or create the configuration file.
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration directory and file.
    Where,
    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration (file plus flags) as TOML.
    Show,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_window_size(spec: &str) -> Result<(u32, u32), String> {
    let (width, height) = spec
        .trim()
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 640x520".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| "invalid width in size specification".to_string())?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| "invalid height in size specification".to_string())?;

    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".to_string());
    }
    Ok((width, height))
}
