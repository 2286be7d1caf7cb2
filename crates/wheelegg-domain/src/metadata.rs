//! Email-header style metadata records (`WHEEL`, `METADATA`).

use std::str::FromStr;

use once_cell::sync::Lazy;
use pep440_rs::Version;

use crate::errors::WheelFormatError;

pub const WHEEL_FILE: &str = "WHEEL";
pub const METADATA_FILE: &str = "METADATA";
pub const WHEEL_VERSION_FIELD: &str = "Wheel-Version";

static MIN_WHEEL_VERSION: Lazy<Version> =
    Lazy::new(|| Version::from_str("1.0").expect("lower bound parses"));
static MAX_WHEEL_VERSION: Lazy<Version> =
    Lazy::new(|| Version::from_str("2.0.dev0").expect("upper bound parses"));

/// Ordered header fields; lookups are case-insensitive and repeated keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    /// Parse the header block; everything after the first blank line is body
    /// and ignored. Indented lines continue the previous value.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = entries.last_mut() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line.trim());
                }
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                tracing::debug!(line, "skipping malformed header line");
                continue;
            };
            entries.push((key.trim().to_string(), value.trim().to_string()));
        }
        Self { entries }
    }

    pub fn get<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.get_all(key).next()
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accept only wheel format 1.x: `1.0 <= Wheel-Version < 2.0.dev0`.
pub fn check_wheel_version(headers: &HeaderMap) -> Result<Version, WheelFormatError> {
    let raw = headers
        .get(WHEEL_VERSION_FIELD)
        .ok_or(WheelFormatError::MissingVersionField)?;
    let version = Version::from_str(raw).map_err(|err| WheelFormatError::InvalidVersion {
        version: raw.to_string(),
        reason: err.to_string(),
    })?;
    if version < *MIN_WHEEL_VERSION || version >= *MAX_WHEEL_VERSION {
        return Err(WheelFormatError::UnsupportedVersion {
            version: raw.to_string(),
        });
    }
    Ok(version)
}
