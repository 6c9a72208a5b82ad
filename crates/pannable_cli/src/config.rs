//! Configuration file handling

use anyhow::{Context, Result};
use pannable_area::PannableConfig;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "pannable.toml";

/// Load a configuration file, or the defaults when no path is given
pub fn load(path: Option<&Path>) -> Result<PannableConfig> {
    let Some(path) = path else {
        tracing::debug!("no config file given, using defaults");
        return Ok(PannableConfig::default());
    };

    let config_path = if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    };

    if !config_path.exists() {
        anyhow::bail!(
            "No config found at {}. Run `pannable config init` to create one.",
            config_path.display()
        );
    }

    PannableConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))
}

/// Write the default configuration to `path`
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let content = PannableConfig::default()
        .to_toml()
        .context("Failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pannable_area::PanMode;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pannable-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config, PannableConfig::default());
    }

    #[test]
    fn test_init_then_load() {
        let path = temp_path("init.toml");
        let _ = fs::remove_file(&path);

        init(&path, false).unwrap();
        assert!(init(&path, false).is_err());
        init(&path, true).unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config, PannableConfig::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = temp_path("bad.toml");
        fs::write(&path, "mode = \"accel\"\ndeceleration = 2.0\n").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("deceleration"));
        assert!(err.to_string().contains("bad.toml"));
        fs::remove_file(&path).unwrap();

        let ok = PannableConfig::from_toml_str("mode = \"accel\"").unwrap();
        assert_eq!(ok.mode, PanMode::Accel);
    }

    #[test]
    fn test_nonexistent_file_is_error() {
        let path = temp_path("missing.toml");
        assert!(load(Some(&path)).is_err());
    }
}
