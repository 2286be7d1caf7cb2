//! Command entry points shared by the CLI; each returns an outcome envelope.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{json, Value};
use wheelegg_domain::{egg_name, WheelFilename};

use crate::config::Config;
use crate::errors::InstallError;
use crate::host::{current_host, HostEnvironment};
use crate::install::install_as_egg;
use crate::outcome::ExecutionOutcome;

#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub wheel: PathBuf,
    pub check: bool,
}

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub wheel: PathBuf,
    pub dest: Option<PathBuf>,
    pub ignore_compat: bool,
}

/// Describe a wheel from its filename alone; `check` adds a host compatibility verdict.
///
/// # Errors
///
/// Only unexpected internal failures; user-facing problems become outcomes.
pub fn inspect(config: &Config, request: &InspectRequest) -> Result<ExecutionOutcome> {
    let wheel = match WheelFilename::parse(&request.wheel) {
        Ok(wheel) => wheel,
        Err(err) => return Ok(install_error_outcome(&InstallError::from(err))),
    };
    let tags = wheel.tags().map(|tag| tag.to_string()).collect::<Vec<_>>();
    let mut details = json!({
        "project_name": wheel.project_name,
        "version": wheel.version,
        "build_tag": wheel.build_tag,
        "py_version": wheel.py_version,
        "abi": wheel.abi,
        "platform": wheel.platform,
        "tags": tags,
    });

    let host = if request.check {
        match current_host(config) {
            Ok(host) => Some(host),
            Err(err) => return Ok(host_probe_failure(&err)),
        }
    } else {
        None
    };
    let platform = host
        .as_ref()
        .map(|host| host.platform.as_str())
        .or_else(|| config.platform());
    if let Value::Object(map) = &mut details {
        if wheel.is_pure() || platform.is_some() {
            let egg = egg_name(&wheel, platform.unwrap_or_default());
            map.insert("egg_name".into(), json!(egg));
        }
        if let Some(host) = &host {
            map.insert(
                "compatible".into(),
                json!(host.supported.is_compatible(wheel.tags())),
            );
        }
    }
    Ok(ExecutionOutcome::success(
        format!("{} {}", wheel.project_name, wheel.version),
        details,
    ))
}

/// Probe the configured interpreter, then convert.
///
/// # Errors
///
/// Only unexpected internal failures; user-facing problems become outcomes.
pub fn convert(config: &Config, request: &ConvertRequest) -> Result<ExecutionOutcome> {
    if let Err(err) = WheelFilename::parse(&request.wheel) {
        return Ok(install_error_outcome(&InstallError::from(err)));
    }
    let host = match current_host(config) {
        Ok(host) => host,
        Err(err) => return Ok(host_probe_failure(&err)),
    };
    convert_with_host(&host, request)
}

/// Convert against an already known host environment.
///
/// # Errors
///
/// Only unexpected internal failures; user-facing problems become outcomes.
pub fn convert_with_host(
    host: &HostEnvironment,
    request: &ConvertRequest,
) -> Result<ExecutionOutcome> {
    let wheel = match WheelFilename::parse(&request.wheel) {
        Ok(wheel) => wheel,
        Err(err) => return Ok(install_error_outcome(&InstallError::from(err))),
    };
    if !host.supported.is_compatible(wheel.tags()) {
        if !request.ignore_compat {
            return Ok(ExecutionOutcome::user_error(
                format!("{wheel} is not compatible with this interpreter"),
                json!({
                    "code": "WE102",
                    "reason": "incompatible_wheel",
                    "tags": wheel.tags().map(|tag| tag.to_string()).collect::<Vec<_>>(),
                    "hint": "Pass --ignore-compat to convert it anyway.",
                }),
            ));
        }
        tracing::warn!(wheel = %wheel, "converting a wheel the host does not support");
    }
    let dest = request
        .dest
        .clone()
        .unwrap_or_else(|| default_destination(&wheel, &host.platform));
    match install_as_egg(&wheel, &dest, &host.markers) {
        Ok(installed) => {
            let details = serde_json::to_value(&installed)?;
            Ok(ExecutionOutcome::success(
                format!("converted {wheel} into {}", installed.egg_dir.display()),
                details,
            ))
        }
        Err(err) => Ok(install_error_outcome(&err)),
    }
}

/// `<wheel dir>/<egg name>`.
pub fn default_destination(wheel: &WheelFilename, platform: &str) -> PathBuf {
    wheel
        .filename
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(egg_name(wheel, platform))
}

fn install_error_outcome(err: &InstallError) -> ExecutionOutcome {
    if err.is_user_error() {
        ExecutionOutcome::user_error(err.to_string(), err.details())
    } else {
        ExecutionOutcome::failure(err.to_string(), err.details())
    }
}

fn host_probe_failure(err: &anyhow::Error) -> ExecutionOutcome {
    ExecutionOutcome::failure(
        "unable to inspect the target interpreter",
        json!({
            "code": "WE401",
            "reason": "host_probe_failed",
            "error": format!("{err:#}"),
            "hint": "Set WHEELEGG_PYTHON or pass --python to choose an interpreter.",
        }),
    )
}
