#![deny(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Converting wheels into egg directories on disk.

pub mod archive;
pub mod commands;
pub mod config;
pub mod errors;
pub mod host;
pub mod install;
pub mod namespace;
pub mod outcome;
pub mod relocate;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::WheelArchive;
pub use commands::{convert, convert_with_host, inspect, ConvertRequest, InspectRequest};
pub use config::{Config, GlobalOptions};
pub use errors::InstallError;
pub use host::{current_host, detect_host, detect_interpreter, HostEnvironment};
pub use install::{install_as_egg, InstalledEgg};
pub use outcome::{format_status_message, to_json_response, CommandStatus, ExecutionOutcome};

pub use wheelegg_domain as domain;
