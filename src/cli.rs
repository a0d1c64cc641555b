//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// workbook-gateway - authentication proxy and page gateway
#[derive(Parser, Debug)]
#[command(name = "workbook-gateway")]
#[command(version)]
#[command(about = "Authentication proxy and page gateway for the workbook platform", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: print to stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load and validate the configuration
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_defaults_to_serve() {
        let cli = Cli::try_parse_from(["workbook-gateway"]).unwrap();
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_config_generate_with_output() {
        let cli = Cli::try_parse_from([
            "workbook-gateway",
            "--config",
            "gw.toml",
            "config",
            "generate",
            "-o",
            "out.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, "gw.toml");
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output: Some("out.toml".to_string()),
                    force: false
                }
            })
        );
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["workbook-gateway", "frobnicate"]).is_err());
    }
}
