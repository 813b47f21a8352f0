//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "advisor-server",
    about = "Chat API for the academic scheduling assistant",
    version
)]
pub struct Args {
    /// Path to a config file. Defaults to the platform config dir.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on. Overrides `server.port` and `PORT`.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log filter directive (e.g. `advisor=debug`). `RUST_LOG` wins.
    #[arg(long)]
    pub log_level: Option<String>,
}
