use std::io;
use std::path::PathBuf;

use serde_json::{json, Value};
use wheelegg_domain::{WheelFormatError, WheelNameError};

/// Everything that can stop a single wheel-to-egg conversion.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Name(#[from] WheelNameError),
    #[error(transparent)]
    Format(#[from] WheelFormatError),
    #[error("failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read wheel archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl InstallError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        let path = path.into();
        match source {
            zip::result::ZipError::Io(source) => Self::Filesystem {
                action: "read",
                path,
                source,
            },
            source => Self::Archive { path, source },
        }
    }

    /// Parse and format problems are the caller's input; the rest is the environment.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Name(_) | Self::Format(_))
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Name(_) => "WE101",
            Self::Format(WheelFormatError::DistInfoMissing { .. })
            | Self::Format(WheelFormatError::WheelFileMissing { .. }) => "WE201",
            Self::Format(WheelFormatError::InvalidMetadata { .. }) => "WE203",
            Self::Format(_) => "WE202",
            Self::Filesystem { .. } => "WE301",
            Self::Archive { .. } => "WE302",
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Name(_) => "invalid_wheel_name",
            Self::Format(err) => err.reason(),
            Self::Filesystem { .. } => "filesystem_error",
            Self::Archive { .. } => "invalid_archive",
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Name(_) => Some("Wheel files are named 'name-version[-build]-python-abi-platform.whl'."),
            Self::Format(WheelFormatError::UnsupportedVersion { .. }) => {
                Some("Only wheel format 1.x can be converted to an egg.")
            }
            Self::Format(_) => Some("Check that the file is a complete wheel built for this project."),
            Self::Filesystem {
                source,
                ..
            } if source.kind() == io::ErrorKind::AlreadyExists => {
                Some("Remove the existing egg directory or pass a different --dest.")
            }
            Self::Filesystem { .. } => None,
            Self::Archive { .. } => Some("The file is not a readable zip archive."),
        }
    }

    #[must_use]
    pub fn details(&self) -> Value {
        let mut details = json!({
            "code": self.code(),
            "reason": self.reason(),
        });
        if let Value::Object(map) = &mut details {
            if let Some(hint) = self.hint() {
                map.insert("hint".into(), json!(hint));
            }
            match self {
                Self::Name(err) => {
                    map.insert("filename".into(), json!(err.filename.display().to_string()));
                }
                Self::Filesystem { path, .. } | Self::Archive { path, .. } => {
                    map.insert("path".into(), json!(path.display().to_string()));
                }
                Self::Format(_) => {}
            }
        }
        details
    }
}
