use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when `init_config`
/// has not been called yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration from the given TOML path
///
/// If the file doesn't exist, uses in-memory defaults plus `WG__*`
/// environment overrides. A file that exists but fails to parse is an
/// error and the global configuration is left untouched.
///
/// # Examples
/// ```no_run
/// use workbook_gateway::config::init_config;
/// init_config("config.toml").expect("invalid configuration");
/// ```
pub fn init_config(path: &str) -> Result<()> {
    let loaded = StaticConfig::try_load(path)?;
    if std::path::Path::new(path).exists() {
        eprintln!("[INFO] Configuration loaded from: {}", path);
    }
    update_config(loaded);
    Ok(())
}

/// Replace the global configuration
pub fn update_config(config: StaticConfig) {
    let slot = CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()));
    slot.store(Arc::new(config));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GatewayError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_config_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[upstream\nbase_url = ").unwrap();

        let result = init_config(path.to_str().unwrap());
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_init_config_rejects_wrong_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typed.toml");
        fs::write(&path, "[server]\nport = \"not-a-port\"\n").unwrap();

        assert!(init_config(path.to_str().unwrap()).is_err());
    }
}
