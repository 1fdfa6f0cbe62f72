// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use location_checker::Config;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "location-checker")]
#[command(about = "Take a photo or check your current location")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Use simulated camera, location and sound instead of real devices
    #[arg(long, global = true)]
    simulate: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: [p] take photo, [l] check location, [q] quit
    Run,

    /// Take one photo and show it
    Photo,

    /// Look up the current position once
    Locate,

    /// Decode an image at reduced size for a view of the given size
    Downscale {
        /// Image file to load
        file: PathBuf,

        /// Target view width in pixels
        #[arg(long, default_value = "400")]
        width: u32,

        /// Target view height in pixels
        #[arg(long, default_value = "300")]
        height: u32,
    },

    /// Print the active configuration
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=location_checker=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    match cli.command {
        Some(Commands::Downscale {
            file,
            width,
            height,
        }) => cli::downscale(&file, width, height),
        Some(Commands::Config) => cli::print_config(&config, cli.config.as_deref()),
        Some(Commands::Photo) => block_on(cli::take_photo(config, cli.simulate)),
        Some(Commands::Locate) => block_on(cli::locate(config, cli.simulate)),
        Some(Commands::Run) | None => block_on(cli::run_interactive(config, cli.simulate)),
    }
}

fn block_on<F>(future: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: std::future::Future<Output = Result<(), Box<dyn std::error::Error>>>,
{
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(future)
}
