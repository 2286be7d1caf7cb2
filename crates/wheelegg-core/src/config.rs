use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

pub const PYTHON_ENV: &str = "WHEELEGG_PYTHON";
pub const PLATFORM_ENV: &str = "WHEELEGG_PLATFORM";

/// Command-line overrides that reach the library; output flags stay in the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub python: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Settings resolved from flags first, then the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    python: Option<String>,
    platform: Option<String>,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env(options: &GlobalOptions) -> Self {
        Self::from_snapshot(&EnvSnapshot::capture(), options)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, options: &GlobalOptions) -> Self {
        Self {
            python: options
                .python
                .clone()
                .or_else(|| snapshot.var(PYTHON_ENV).map(ToOwned::to_owned)),
            platform: options
                .platform
                .clone()
                .or_else(|| snapshot.var(PLATFORM_ENV).map(ToOwned::to_owned)),
        }
    }

    /// Interpreter to probe for tags and markers.
    #[must_use]
    pub fn python(&self) -> Option<&str> {
        self.python.as_deref()
    }

    /// Platform descriptor that replaces the probed one in egg names.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }
}
