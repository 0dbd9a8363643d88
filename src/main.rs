use anyhow::Result;
use clap::Parser;

use recipes::{
    app::{load_config, AppState},
    cli::{self, Cli, Commands},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Init doesn't need a cache or network client
    if let Commands::Init = cli.command {
        return cli::init();
    }

    let config = load_config(cli.config.as_deref())?;
    let app = AppState::new(config)?;

    let result = cli::handle_command(&cli.command, &app).await;

    // Background disk writes are fire-and-forget; give them a chance to land
    app.shutdown().await;

    result
}
