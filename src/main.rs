use clap::Parser;
use colored::Colorize;

use workbook_gateway::cli::{Cli, Commands};
use workbook_gateway::config::{get_config, init_config};
use workbook_gateway::interfaces::cli::run_cli;
use workbook_gateway::runtime::run_server;
use workbook_gateway::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // CLI Mode
    if let Some(command) = cli.command
        && command != Commands::Serve
    {
        if let Err(e) = run_cli(&cli.config, command) {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            std::process::exit(1);
        }
        return Ok(());
    }

    // Server Mode
    init_config(&cli.config)?;
    let config = get_config();
    let _log_guard = init_logging(&config.logging)?;

    if let Err(e) = run_server(config).await {
        tracing::error!("Server exited with error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
