//! Configuration loading utilities
//!
//! Small TOML plus environment based configuration support shared by the
//! workspace crates. Each crate defines its own serde settings struct and
//! loads it through the helpers here, keeping file handling and error
//! reporting in one place.

use crate::error::{ApplicationError, ApplicationResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Loads a TOML configuration file into any `serde`-deserializable type.
///
/// # Errors
///
/// Returns [`ApplicationError::ConfigRead`] when the file cannot be read and
/// [`ApplicationError::ConfigParse`] when its content is not valid TOML for
/// the target type.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> ApplicationResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| ApplicationError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ApplicationError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a TOML configuration file, falling back to `T::default()` when the
/// file does not exist.
///
/// A missing file is the common case for optional framework configuration,
/// so it is not treated as an error; any other read or parse failure still
/// is.
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: &Path) -> ApplicationResult<T> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(T::default());
    }
    load_toml(path)
}

/// Reads a `WYVERN_`-prefixed environment override for a configuration key.
///
/// The key is uppercased and `.`/`-` separators are replaced with `_`, so
/// `download.buffer-size` is looked up as `WYVERN_DOWNLOAD_BUFFER_SIZE`.
pub fn env_override(key: &str) -> Option<String> {
    let var = format!(
        "WYVERN_{}",
        key.to_uppercase().replace(['.', '-'], "_")
    );
    std::env::var(var).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct SampleSettings {
        name: String,
        workers: usize,
    }

    #[test]
    fn test_load_toml() {
        let dir = std::env::temp_dir().join("wyvern-core-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.toml");
        std::fs::write(&path, "name = \"wyvern\"\nworkers = 4\n").unwrap();

        let settings: SampleSettings = load_toml(&path).unwrap();
        assert_eq!(settings.name, "wyvern");
        assert_eq!(settings.workers, 4);
    }

    #[test]
    fn test_load_toml_missing_file() {
        let path = Path::new("/definitely/not/here.toml");
        let result: ApplicationResult<SampleSettings> = load_toml(path);
        assert!(matches!(result, Err(ApplicationError::ConfigRead { .. })));
    }

    #[test]
    fn test_load_toml_or_default_missing_file() {
        let path = Path::new("/definitely/not/here.toml");
        let settings: SampleSettings = load_toml_or_default(path).unwrap();
        assert_eq!(settings, SampleSettings::default());
    }

    #[test]
    fn test_load_toml_parse_error() {
        let dir = std::env::temp_dir().join("wyvern-core-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "workers = \"not a number\"\n").unwrap();

        let result: ApplicationResult<SampleSettings> = load_toml(&path);
        assert!(matches!(result, Err(ApplicationError::ConfigParse { .. })));
    }

    #[test]
    fn test_env_override_key_mapping() {
        std::env::set_var("WYVERN_DOWNLOAD_BUFFER_SIZE", "16384");
        assert_eq!(
            env_override("download.buffer-size").as_deref(),
            Some("16384")
        );
        std::env::remove_var("WYVERN_DOWNLOAD_BUFFER_SIZE");

        assert_eq!(env_override("download.buffer-size"), None);
    }
}
