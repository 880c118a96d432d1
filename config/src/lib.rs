//! Configuration for VibeCut.
//!
//! Two layers:
//!
//! - [`load_and_apply`] reads XDG `config.toml` and the project `.env`, then sets process
//!   environment variables with priority **existing env > .env > XDG**.
//! - [`Settings`] reads the environment once at startup, validates the enumerated
//!   [`RequiredKey`]s and is passed explicitly to every component constructor.

mod dotenv;
mod settings;
mod xdg_toml;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use thiserror::Error;

pub use settings::{
    RequiredKey, Settings, SettingsError, DEFAULT_MAX_CLIPS_PER_INTENT, DEFAULT_MIN_RELEVANCE,
    DEFAULT_PLANNER_MODEL, DEFAULT_VIDEODB_BASE_URL,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Chooses a value for every key that `is_set` reports as absent: `.env` first, then XDG.
/// Output is sorted by key.
fn resolve_missing<F>(
    is_set: F,
    dotenv_map: &HashMap<String, String>,
    xdg_map: &HashMap<String, String>,
) -> BTreeMap<String, String>
where
    F: Fn(&str) -> bool,
{
    xdg_map
        .iter()
        .chain(dotenv_map.iter())
        .map(|(k, _)| k)
        .filter(|k| !is_set(k.as_str()))
        .filter_map(|k| {
            dotenv_map
                .get(k)
                .or_else(|| xdg_map.get(k))
                .map(|v| (k.clone(), v.clone()))
        })
        .collect()
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` and the project `.env`, then sets
/// only the variables that are **not** already present in the process environment.
///
/// * `app_name`: directory name under the XDG config home, e.g. `"vibecut"`.
/// * `override_dir`: look for `.env` here instead of the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let missing = resolve_missing(|k| std::env::var_os(k).is_some(), &dotenv_map, &xdg_map);
    for (key, value) in missing {
        std::env::set_var(key, value);
    }
    Ok(())
}
