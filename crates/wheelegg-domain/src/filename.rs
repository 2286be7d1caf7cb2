use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::WheelNameError;
use crate::tags::{tag_triples, TagTriple};

// Lazy groups on every field: the first valid split wins, so names that
// contain `-<digit>` are split at their first such hyphen.
static WHEEL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<project_name>.+?)-(?P<version>\d.*?)(?:-(?P<build>\d.*?))?-(?P<py_version>.+?)-(?P<abi>.+?)-(?P<platform>.+?)\.whl$",
    )
    .expect("wheel name pattern compiles")
});

/// Identity of a wheel as encoded in its filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WheelFilename {
    pub filename: PathBuf,
    pub project_name: String,
    pub version: String,
    pub build_tag: Option<String>,
    pub py_version: String,
    pub abi: String,
    pub platform: String,
}

impl WheelFilename {
    /// Parse the basename of `filename`; the directory part is kept but ignored.
    pub fn parse(filename: impl AsRef<Path>) -> Result<Self, WheelNameError> {
        let path = filename.as_ref();
        let basename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| WheelNameError::new(path))?;
        let captures = WHEEL_NAME
            .captures(basename)
            .ok_or_else(|| WheelNameError::new(path))?;
        let field = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        Ok(Self {
            filename: path.to_path_buf(),
            project_name: field("project_name"),
            version: field("version"),
            build_tag: captures.name("build").map(|m| m.as_str().to_string()),
            py_version: field("py_version"),
            abi: field("abi"),
            platform: field("platform"),
        })
    }

    /// `{project_name}-{version}`, the prefix of the `.data` directory.
    pub fn dist_basename(&self) -> String {
        format!("{}-{}", self.project_name, self.version)
    }

    /// Every (python, abi, platform) combination the wheel declares, lazily.
    pub fn tags(&self) -> impl Iterator<Item = TagTriple<'_>> {
        tag_triples(&self.py_version, &self.abi, &self.platform)
    }

    pub fn is_pure(&self) -> bool {
        self.platform == "any"
    }
}

impl fmt::Display for WheelFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project_name, self.version)?;
        if let Some(build) = &self.build_tag {
            write!(f, "-{build}")?;
        }
        write!(f, "-{}-{}-{}.whl", self.py_version, self.abi, self.platform)
    }
}
