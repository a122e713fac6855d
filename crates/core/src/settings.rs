//! Session settings loaded from TOML and the environment

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use smart_tests_graph::PartialConfig;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Environment variable overriding [`Settings::fail_fast`]
pub const FAIL_FAST_ENV: &str = "SMART_TESTS_FAIL_FAST";

/// Settings a [`crate::TestSession`] can be built from.
///
/// ```toml
/// failFast = true
///
/// [dependencies]
/// "Login" = ["View profile", "Edit profile"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Settings {
    /// Request fail-fast propagation logging
    pub fail_fast: bool,
    /// Parent test name to the names of its dependents
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the text is not valid settings TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input)
            .map_err(|e| Error::configuration(format!("invalid settings: {}", e.message())))
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Configuration`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(e, path, "read"))?;
        let settings = Self::from_toml_str(&contents)?;
        debug!(
            path = %path.display(),
            fail_fast = settings.fail_fast,
            parents = settings.dependencies.len(),
            "Loaded settings"
        );
        Ok(settings)
    }

    /// Apply `SMART_TESTS_FAIL_FAST` if set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the variable holds anything other
    /// than `true`, `false`, `1` or `0`.
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(FAIL_FAST_ENV) {
            self.fail_fast = parse_bool(&raw).ok_or_else(|| {
                Error::configuration(format!(
                    "{FAIL_FAST_ENV} must be one of true, false, 1 or 0, got '{raw}'"
                ))
            })?;
            debug!(fail_fast = self.fail_fast, "Applied {FAIL_FAST_ENV}");
        }
        Ok(self)
    }

    /// The tracker configuration these settings describe
    #[must_use]
    pub fn tracker_config(&self) -> PartialConfig {
        PartialConfig::fail_fast(self.fail_fast)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
