//! Settings for the front-ends: dataset location, default scope and the
//! fallback responder.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! environment variables. The API token is only ever read from the
//! environment.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::scope::ScopeSpec;
use crate::error::ConfigError;

/// Environment variable holding the fallback API token.
pub const TOKEN_ENV: &str = "HUGGINGFACEHUB_API_TOKEN";
pub const DATASET_ENV: &str = "ROSTER_DATASET";
pub const CONFIG_ENV: &str = "ROSTER_CONFIG";
pub const MODEL_ENV: &str = "ROSTER_FALLBACK_MODEL";
pub const API_BASE_ENV: &str = "ROSTER_FALLBACK_URL";
pub const TIMEOUT_ENV: &str = "ROSTER_FALLBACK_TIMEOUT_SECS";

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset file loaded at start-up.
    pub dataset: PathBuf,
    /// Scope pre-filled in the front-ends.
    pub scope: ScopeSpec,
    pub fallback: FallbackSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("dataset.csv"),
            scope: ScopeSpec::unrestricted()
                .with_grade(8)
                .with_class("A")
                .with_region("North"),
            fallback: FallbackSettings::default(),
        }
    }
}

/// Fallback responder configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    /// Base URL; the model name is appended as the last path segment.
    pub api_base: String,
    pub model: String,
    /// Upper bound for a single fallback request, connect included.
    pub timeout_secs: u64,
    /// Bearer token, taken from the environment only.
    #[serde(skip)]
    pub api_token: Option<String>,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api-inference.huggingface.co/models".to_string(),
            model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            timeout_secs: 30,
            api_token: None,
        }
    }
}

impl FallbackSettings {
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), self.model)
    }
}

impl fmt::Debug for FallbackSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackSettings")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Settings {
    /// Defaults, the file named by `path` (or `$ROSTER_CONFIG`) if any, then
    /// the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut settings = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if settings.fallback.timeout_secs == 0 {
            let default = FallbackSettings::default().timeout_secs;
            log::warn!(
                "ignoring fallback.timeout_secs = 0 in {}: using {default}s",
                path.display()
            );
            settings.fallback.timeout_secs = default;
        }
        log::debug!("read settings from {}", path.display());
        Ok(settings)
    }

    /// Apply variable overrides from `lookup` (the process environment in
    /// [`Settings::load`]). Blank values are ignored; an unparsable timeout
    /// keeps the current value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dataset) = get(DATASET_ENV) {
            self.dataset = PathBuf::from(dataset);
        }
        if let Some(model) = get(MODEL_ENV) {
            self.fallback.model = model;
        }
        if let Some(base) = get(API_BASE_ENV) {
            self.fallback.api_base = base;
        }
        if let Some(raw) = get(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.fallback.timeout_secs = secs,
                _ => log::warn!("ignoring {TIMEOUT_ENV}={raw:?}: expected a positive number of seconds"),
            }
        }
        self.fallback.api_token = get(TOKEN_ENV).or(self.fallback.api_token.take());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_the_classroom_setup() {
        let settings = Settings::default();
        assert_eq!(settings.dataset, PathBuf::from("dataset.csv"));
        assert_eq!(settings.scope.to_string(), "grade 8, class A, region North");
        assert_eq!(
            settings.fallback.endpoint(),
            "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2"
        );
        assert_eq!(settings.fallback.timeout_secs, 30);
    }

    #[test]
    fn toml_overrides_defaults_per_field() {
        let settings: Settings = toml::from_str(
            r#"
            dataset = "data/roster.tsv"

            [scope]
            grade = 7
            class = "B"

            [fallback]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.dataset, PathBuf::from("data/roster.tsv"));
        assert_eq!(settings.scope.grade, Some(7));
        assert_eq!(settings.scope.class_label.as_deref(), Some("B"));
        assert_eq!(settings.scope.region, None);
        assert_eq!(settings.fallback.timeout_secs, 5);
        assert_eq!(settings.fallback.model, "mistralai/Mistral-7B-Instruct-v0.2");
    }

    #[test]
    fn environment_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DATASET_ENV, "other.csv"),
            (TOKEN_ENV, "hf_secret"),
            (API_BASE_ENV, "http://localhost:8080/models/"),
            (MODEL_ENV, "tiny"),
            (TIMEOUT_ENV, "3"),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.dataset, PathBuf::from("other.csv"));
        assert_eq!(settings.fallback.api_token.as_deref(), Some("hf_secret"));
        assert_eq!(settings.fallback.endpoint(), "http://localhost:8080/models/tiny");
        assert_eq!(settings.fallback.timeout_secs, 3);
    }

    #[test]
    fn bad_timeout_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([(TIMEOUT_ENV, "soon"), (TOKEN_ENV, "  ")]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.fallback.timeout_secs, 30);
        assert_eq!(settings.fallback.api_token, None);
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let mut settings = FallbackSettings::default();
        settings.api_token = Some("hf_secret".into());
        let shown = format!("{settings:?}");
        assert!(!shown.contains("hf_secret"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn zero_timeout_in_file_keeps_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, "[fallback]\ntimeout_secs = 0\nmodel = \"tiny\"\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.fallback.timeout_secs, 30);
        assert_eq!(settings.fallback.model, "tiny");
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
