//! Typed settings read from the environment once at startup.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_VIDEODB_BASE_URL: &str = "https://api.videodb.io";
pub const DEFAULT_PLANNER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MIN_RELEVANCE: f64 = 0.5;
pub const DEFAULT_MAX_CLIPS_PER_INTENT: usize = 3;

/// Keys that must be present for a hosted run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequiredKey {
    /// Search index and assembly engine.
    VideoDbApiKey,
    /// Planning model.
    OpenAiApiKey,
}

impl RequiredKey {
    pub const ALL: [RequiredKey; 2] = [RequiredKey::VideoDbApiKey, RequiredKey::OpenAiApiKey];

    pub fn env_name(&self) -> &'static str {
        match self {
            RequiredKey::VideoDbApiKey => "VIDEODB_API_KEY",
            RequiredKey::OpenAiApiKey => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for RequiredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("missing required configuration: {}", join_keys(.0))]
    MissingKeys(Vec<RequiredKey>),
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

fn join_keys(keys: &[RequiredKey]) -> String {
    keys.iter()
        .map(RequiredKey::env_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Application settings. Built by [`Settings::from_env`] and handed to constructors; nothing
/// else in the workspace reads API keys from the environment.
#[derive(Clone, PartialEq)]
pub struct Settings {
    videodb_api_key: String,
    videodb_base_url: String,
    openai_api_key: String,
    openai_base_url: Option<String>,
    planner_model: String,
    min_relevance: f64,
    stage_timeout: Option<Duration>,
    max_clips_per_intent: usize,
}

impl Settings {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads from a map; used by tests and by callers that assemble config themselves.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, SettingsError> {
        Self::from_lookup(|key| map.get(key).cloned())
    }

    /// Reads every key through `lookup`. Empty values count as unset. All missing required
    /// keys are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<RequiredKey> = RequiredKey::ALL
            .into_iter()
            .filter(|k| get(k.env_name()).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SettingsError::MissingKeys(missing));
        }
        let videodb_api_key = get(RequiredKey::VideoDbApiKey.env_name()).unwrap_or_default();
        let openai_api_key = get(RequiredKey::OpenAiApiKey.env_name()).unwrap_or_default();

        let min_relevance = match get("VIBECUT_MIN_RELEVANCE") {
            Some(raw) => parse_relevance(&raw)?,
            None => DEFAULT_MIN_RELEVANCE,
        };
        let stage_timeout = match get("VIBECUT_STAGE_TIMEOUT_SECS") {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };
        let max_clips_per_intent = match get("VIBECUT_MAX_CLIPS_PER_INTENT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(SettingsError::InvalidValue {
                        key: "VIBECUT_MAX_CLIPS_PER_INTENT",
                        value: raw,
                        reason: "expected a positive integer",
                    })
                }
            },
            None => DEFAULT_MAX_CLIPS_PER_INTENT,
        };

        Ok(Self {
            videodb_api_key,
            videodb_base_url: get("VIDEODB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VIDEODB_BASE_URL.to_string()),
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL"),
            planner_model: get("VIBECUT_PLANNER_MODEL")
                .unwrap_or_else(|| DEFAULT_PLANNER_MODEL.to_string()),
            min_relevance,
            stage_timeout,
            max_clips_per_intent,
        })
    }

    pub fn videodb_api_key(&self) -> &str {
        &self.videodb_api_key
    }

    pub fn videodb_base_url(&self) -> &str {
        &self.videodb_base_url
    }

    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }

    pub fn openai_base_url(&self) -> Option<&str> {
        self.openai_base_url.as_deref()
    }

    pub fn planner_model(&self) -> &str {
        &self.planner_model
    }

    /// Minimum relevance score a clip candidate needs to be considered, in `[0, 1]`.
    pub fn min_relevance(&self) -> f64 {
        self.min_relevance
    }

    /// Per-stage timeout; `None` means stages are unbounded.
    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout
    }

    pub fn max_clips_per_intent(&self) -> usize {
        self.max_clips_per_intent
    }

    /// Overrides the relevance threshold (e.g. from a CLI flag).
    pub fn with_min_relevance(mut self, min_relevance: f64) -> Result<Self, SettingsError> {
        self.min_relevance = parse_relevance(&min_relevance.to_string())?;
        Ok(self)
    }

    pub fn with_stage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stage_timeout = timeout;
        self
    }
}

fn parse_relevance(raw: &str) -> Result<f64, SettingsError> {
    match raw.parse::<f64>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
        _ => Err(SettingsError::InvalidValue {
            key: "VIBECUT_MIN_RELEVANCE",
            value: raw.to_string(),
            reason: "expected a number between 0 and 1",
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, SettingsError> {
    let parsed = raw
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
    match parsed {
        Some(timeout) => Ok(timeout),
        None => Err(SettingsError::InvalidValue {
            key: "VIBECUT_STAGE_TIMEOUT_SECS",
            value: raw.to_string(),
            reason: "expected a positive number of seconds",
        }),
    }
}

fn redact(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", tail)
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("videodb_api_key", &redact(&self.videodb_api_key))
            .field("videodb_base_url", &self.videodb_base_url)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("planner_model", &self.planner_model)
            .field("min_relevance", &self.min_relevance)
            .field("stage_timeout", &self.stage_timeout)
            .field("max_clips_per_intent", &self.max_clips_per_intent)
            .finish()
    }
}
