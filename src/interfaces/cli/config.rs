//! Config commands

use std::path::Path;

use colored::Colorize;

use crate::config::{StaticConfig, validate_config};

use super::CliError;

/// 生成示例配置；没有 output 时输出到 stdout
pub fn config_generate(output: Option<String>, force: bool) -> Result<(), CliError> {
    let Some(path) = output else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if !force && Path::new(&path).exists() {
        return Err(CliError::IoError(format!(
            "{} already exists, use --force to overwrite",
            path
        )));
    }

    StaticConfig::default().save_to_file(&path)?;
    println!(
        "{} {}",
        "Configuration file generated:".green(),
        path.blue()
    );
    Ok(())
}

/// 加载并验证配置，存在错误时返回 Err
pub fn config_check(path: &str) -> Result<(), CliError> {
    let config = StaticConfig::try_load(path)?;
    let issues = validate_config(&config);

    if issues.is_empty() {
        println!("{} {}", "Configuration OK:".green(), path.blue());
        return Ok(());
    }

    for issue in &issues {
        if issue.is_error() {
            println!("{}", issue.to_string().red());
        } else {
            println!("{}", issue.to_string().yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        return Err(CliError::ConfigError(format!(
            "{} error(s) found in configuration",
            errors
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# existing").unwrap();

        let result = config_generate(Some(path.to_string_lossy().to_string()), false);
        assert!(matches!(result, Err(CliError::IoError(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# existing");

        config_generate(Some(path.to_string_lossy().to_string()), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[upstream]"));
    }

    #[test]
    fn test_check_reports_invalid_upstream() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[upstream]\nbase_url = \"ftp://backend\"\n").unwrap();

        let result = config_check(path.to_str().unwrap());
        assert!(matches!(result, Err(CliError::ConfigError(_))));
    }
}
