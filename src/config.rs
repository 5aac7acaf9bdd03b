use redwatch_core::{AppConfig, ConfigError};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Loads the JSON configuration, writing a starter template when the file
/// does not exist. The run then aborts so the user can fill in credentials.
pub fn load_or_init(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        error!("Config file '{}' not found. Creating a template...", path.display());
        write_template(path)?;
        info!("Created template config file: '{}'", path.display());
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let raw = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&raw)?;
    if config.has_placeholder_credentials() {
        return Err(ConfigError::PlaceholderCredentials);
    }
    Ok(config)
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    let template = AppConfig::template();
    let body = serde_json::to_string_pretty(&template)?;
    fs::write(path, body)?;
    Ok(())
}
