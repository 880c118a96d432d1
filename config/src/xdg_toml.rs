//! Load the `[env]` table from `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set, otherwise the platform config directory.
fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory for this platform".into()))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Reads `<config_home>/<app_name>/config.toml`. Missing file or missing `[env]` gives an empty map.
pub(crate) fn load_env_map_from(
    config_home: &Path,
    app_name: &str,
) -> Result<HashMap<String, String>, LoadError> {
    let path = config_home.join(app_name).join("config.toml");
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}

pub(crate) fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    load_env_map_from(&config_home()?, app_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(root: &Path, app: &str, body: &str) {
        let dir = root.join(app);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), body).unwrap();
    }

    #[test]
    fn missing_config_returns_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = load_env_map_from(dir.path(), "vibecut").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn reads_env_table() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "vibecut",
            "[env]\nVIDEODB_API_KEY = \"vdb\"\nVIBECUT_MIN_RELEVANCE = \"0.7\"\n",
        );
        let map = load_env_map_from(dir.path(), "vibecut").unwrap();
        assert_eq!(map.get("VIDEODB_API_KEY").map(String::as_str), Some("vdb"));
        assert_eq!(map.get("VIBECUT_MIN_RELEVANCE").map(String::as_str), Some("0.7"));
    }

    #[test]
    fn other_tables_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "vibecut", "[ui]\ntheme = \"dark\"\n");
        let map = load_env_map_from(dir.path(), "vibecut").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "vibecut", "env = [[[\n");
        let result = load_env_map_from(dir.path(), "vibecut");
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
