//! CLI interface module

mod config;

pub use config::{config_check, config_generate};

use crate::cli::{Commands, ConfigCommands};

#[derive(Debug)]
pub enum CliError {
    ConfigError(String),
    IoError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::IoError(msg) => format!("IO error: {}", msg),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::GatewayError> for CliError {
    fn from(err: crate::errors::GatewayError) -> Self {
        CliError::ConfigError(err.format_simple())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError(err.to_string())
    }
}

/// 执行非 serve 的 CLI 命令
pub fn run_cli(config_path: &str, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve => Ok(()),
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output, force } => config_generate(output, force),
            ConfigCommands::Check => config_check(config_path),
        },
    }
}
