use std::path::PathBuf;

/// The archive filename does not follow `name-version[-build]-py-abi-platform.whl`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid wheel name: '{}'", filename.display())]
pub struct WheelNameError {
    pub filename: PathBuf,
}

impl WheelNameError {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// The archive contents cannot be converted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WheelFormatError {
    #[error("unsupported wheel format: .dist-info not found for '{project}'")]
    DistInfoMissing { project: String },
    #[error("unsupported wheel format: {dist_info}/WHEEL not found")]
    WheelFileMissing { dist_info: String },
    #[error("unsupported wheel format: WHEEL has no Wheel-Version field")]
    MissingVersionField,
    #[error("unsupported wheel format version: '{version}' is not a valid version ({reason})")]
    InvalidVersion { version: String, reason: String },
    #[error("unsupported wheel format version: {version}")]
    UnsupportedVersion { version: String },
    #[error("invalid METADATA entry '{entry}': {reason}")]
    InvalidMetadata { entry: String, reason: String },
}

impl WheelFormatError {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::DistInfoMissing { .. } => "dist_info_missing",
            Self::WheelFileMissing { .. } => "wheel_file_missing",
            Self::MissingVersionField | Self::InvalidVersion { .. } => "invalid_wheel_version",
            Self::UnsupportedVersion { .. } => "unsupported_wheel_version",
            Self::InvalidMetadata { .. } => "invalid_metadata",
        }
    }
}
