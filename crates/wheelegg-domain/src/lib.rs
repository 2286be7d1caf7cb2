#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Pure wheel-to-egg conversion rules: filename grammar, tag matching,
//! legacy naming, metadata parsing, and requirement translation.

pub mod dist_info;
pub mod egg;
pub mod errors;
pub mod filename;
pub mod metadata;
pub mod names;
pub mod requirements;
pub mod tags;

pub use dist_info::DistInfo;
pub use egg::{egg_name, EGG_INFO_DIR, NAMESPACE_PACKAGES_FILE, PKG_INFO_FILE, REQUIRES_FILE};
pub use errors::{WheelFormatError, WheelNameError};
pub use filename::WheelFilename;
pub use metadata::{check_wheel_version, HeaderMap, METADATA_FILE, WHEEL_FILE};
pub use names::{canonicalize_name, safe_extra, to_filename};
pub use requirements::EggRequirements;
pub use tags::{SupportedTag, SupportedTags, TagTriple};
