use clap::Parser;
use std::fs;
use tempfile::TempDir;

use workbook_gateway::cli::{Cli, Commands, ConfigCommands};
use workbook_gateway::config::StaticConfig;
use workbook_gateway::interfaces::cli::{CliError, config_check, config_generate, run_cli};

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_defaults_to_serve() {
    let cli = Cli::try_parse_from(["workbook-gateway"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.config, "config.toml");
}

#[test]
fn test_cli_parses_config_generate() {
    let cli =
        Cli::try_parse_from(["workbook-gateway", "config", "generate", "-o", "out.toml", "--force"])
            .unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Config {
            action: ConfigCommands::Generate {
                output: Some("out.toml".to_string()),
                force: true,
            }
        })
    );
}

#[test]
fn test_cli_global_config_flag() {
    let cli = Cli::try_parse_from(["workbook-gateway", "config", "check", "-c", "/etc/wg.toml"])
        .unwrap();
    assert_eq!(cli.config, "/etc/wg.toml");
    assert_eq!(
        cli.command,
        Some(Commands::Config {
            action: ConfigCommands::Check
        })
    );
}

#[test]
fn test_cli_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["workbook-gateway", "migrate"]).is_err());
}

#[test]
fn test_config_generate_writes_loadable_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("generated.toml");
    let path_str = path.to_string_lossy().into_owned();

    config_generate(Some(path_str.clone()), false).unwrap();
    assert!(path.exists());

    let loaded = StaticConfig::try_load(&path_str).unwrap();
    assert_eq!(loaded.cookie.name, "access_token");
    assert_eq!(loaded.guard.auth_path, "/auth");
}

#[test]
fn test_config_generate_refuses_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "existing.toml", "# keep me\n");

    let result = config_generate(Some(path.clone()), false);
    assert!(matches!(result, Err(CliError::IoError(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# keep me\n");

    config_generate(Some(path.clone()), true).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("[upstream]"));
}

#[test]
fn test_config_check_accepts_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "valid.toml",
        r#"
[upstream]
base_url = "http://127.0.0.1:8000"
timeout_ms = 5000

[cookie]
name = "access_token"
"#,
    );

    assert!(config_check(&path).is_ok());
}

#[test]
fn test_config_check_reports_errors() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "invalid.toml",
        r#"
[upstream]
base_url = "ftp://files.example.com"
timeout_ms = 0
"#,
    );

    let result = run_cli(
        &path,
        Commands::Config {
            action: ConfigCommands::Check,
        },
    );
    assert!(matches!(result, Err(CliError::ConfigError(_))));
}
