//! TouchFabric CLI
//!
//! Usage:
//!   touchfabric run [OPTIONS]        Run the frame loop and send touches
//!   touchfabric listen [OPTIONS]     Print received touch batches as JSON lines
//!   touchfabric area <ACTION>        Show or edit the active area file
//!   touchfabric config <ACTION>      Show or write the configuration
//!   touchfabric simulate <OUTPUT>    Write a synthetic blob replay file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use touchfabric_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "touchfabric",
    about = "Depth-camera touch surface: blobs in, OSC touches out",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/touchfabric/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the frame loop; operator commands are read from stdin
    Run {
        /// Replay blob frames from a JSONL file instead of the stub tracker
        #[arg(short, long)]
        replay: Option<PathBuf>,

        /// Stop replaying at the end of the file instead of looping
        #[arg(long)]
        once: bool,

        /// Exit after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Override the listener host
        #[arg(long)]
        host: Option<String>,

        /// Override the listener port
        #[arg(long)]
        port: Option<u16>,

        /// Override the frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Active area file
        #[arg(long)]
        area: Option<PathBuf>,

        /// Start in edit mode
        #[arg(long)]
        edit: bool,
    },

    /// Receive `/touches` messages and print each batch as a JSON line
    Listen {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Port to bind (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show or edit the active area file
    Area {
        /// Active area file (defaults to the configured file)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: AreaAction,
    },

    /// Show or write the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Write a synthetic blob replay file
    Simulate {
        /// Output JSONL file
        output: PathBuf,

        /// Frames with blobs
        #[arg(long, default_value = "300")]
        frames: u64,

        /// Blobs per frame
        #[arg(long, default_value = "3")]
        blobs: usize,

        /// Empty frames appended at the end
        #[arg(long, default_value = "30")]
        idle: u64,
    },
}

#[derive(Subcommand)]
pub enum AreaAction {
    /// Print the vertices and bounding box
    Show,
    /// Replace the area with an empty one
    Clear,
    /// Append a vertex in frame coordinates and close the area
    Add { x: f64, y: f64 },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(touchfabric_common::config::config_file_path);
    let config = AppConfig::load_from(&config_path);

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    touchfabric_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Run {
            replay,
            once,
            frames,
            host,
            port,
            fps,
            area,
            edit,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.network.host = host;
            }
            if let Some(port) = port {
                config.network.port = port;
            }
            if let Some(fps) = fps {
                config.frames.fps = fps;
            }
            if let Some(area) = area {
                config.area.file = area;
            }
            config.area.edit_mode |= edit;
            commands::run::run(config, replay, !once, frames).await
        }
        Commands::Listen { bind, port } => {
            let port = port.unwrap_or(config.network.port);
            commands::listen::run(bind, port, config.network.address).await
        }
        Commands::Area { file, action } => {
            let file = file.unwrap_or(config.area.file);
            commands::area::run(file, action)
        }
        Commands::Config { action } => commands::config::run(&config, &config_path, action),
        Commands::Simulate {
            output,
            frames,
            blobs,
            idle,
        } => commands::simulate::run(output, &config, frames, blobs, idle),
    }
}
