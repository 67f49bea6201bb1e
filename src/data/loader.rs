//! RON config loader
//!
//! Loads `rarities.ron`, with fallback to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use super::settings::RarityConfig;
use super::validate::validate;

/// File name of the config inside the config directory
pub const CONFIG_FILE: &str = "rarities.ron";

/// Where the config lives when no path is given
pub fn default_config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "rareforge", "Rareforge") {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push(CONFIG_FILE);
        path
    } else {
        PathBuf::from(CONFIG_FILE)
    }
}

/// Parse a config document without touching the filesystem
pub fn parse_config(content: &str, path: &Path) -> Result<RarityConfig, LoadError> {
    ron::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a config file without validating it
pub fn read_config_file(path: &Path) -> Result<RarityConfig, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

/// Read, parse and validate a config file
///
/// Validation warnings are logged; the first validation error fails the load.
pub fn load_config(path: &Path) -> Result<RarityConfig, LoadError> {
    let config = read_config_file(path)?;

    let warnings = validate(&config).into_result()?;
    for warning in &warnings {
        log::warn!("{}: {}", path.display(), warning);
    }
    log::info!("Loaded {} tiers from {}", config.tiers.len(), path.display());
    Ok(config)
}

/// Load a config file, or the defaults if it is missing or broken
pub fn load_or_default(path: &Path) -> RarityConfig {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return RarityConfig::default();
    }
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            RarityConfig::default()
        }
    }
}

/// Render a config as pretty RON
pub fn to_ron(config: &RarityConfig) -> Result<String, LoadError> {
    let pretty = ron::ser::PrettyConfig::default().struct_names(false);
    Ok(ron::ser::to_string_pretty(config, pretty)?)
}

/// Write the default config for easy editing, creating parent directories
pub fn export_default_config(path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| LoadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let content = to_ron(&RarityConfig::default())?;
    fs::write(path, content).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_export_then_load_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        export_default_config(&path).unwrap();
        assert!(path.exists());

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, RarityConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(matches!(load_config(&path), Err(LoadError::Io { .. })));
        assert_eq!(load_or_default(&path).tiers.len(), 8);
    }

    #[test]
    fn test_parse_error_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(tiers: [").unwrap();
        assert!(matches!(load_config(&path), Err(LoadError::Parse { .. })));
        assert_eq!(load_or_default(&path), RarityConfig::default());
    }

    #[test]
    fn test_invalid_chain_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"(tiers: [
                (id: "a", display_name: "A", color: "white", tier_index: 0, craft_chance: 50.0, upgrade_target: Some("ghost")),
            ])"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(&path),
            Err(LoadError::Invalid(ConfigError::DanglingUpgradeTarget { .. }))
        ));

        // Reading alone leaves judging the chain to the caller
        let raw = read_config_file(&path).unwrap();
        assert_eq!(raw.tiers.len(), 1);
        assert!(!validate(&raw).is_valid());
    }

    #[test]
    fn test_read_reports_path_in_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let missing = read_config_file(&path).unwrap_err();
        assert!(missing.to_string().contains(CONFIG_FILE));

        fs::write(&path, "(tiers: [").unwrap();
        let broken = read_config_file(&path).unwrap_err();
        assert!(matches!(broken, LoadError::Parse { .. }));
        assert!(broken.to_string().starts_with("failed to parse"));
    }
}
