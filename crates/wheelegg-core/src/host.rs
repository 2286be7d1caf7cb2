//! Probing the target interpreter for the facts egg conversion depends on.

use std::process::Command;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use pep508_rs::{MarkerEnvironment, StringVersion};
use serde::Deserialize;
use serde_json::from_slice;
use which::which;
use wheelegg_domain::{SupportedTag, SupportedTags};

use crate::config::Config;

const HOST_SCRIPT: &str = r#"import json, os, platform, sys, sysconfig
major = sys.version_info[0]
minor = sys.version_info[1]

def collect_tags():
    try:
        from packaging import tags as packaging_tags
        return list(packaging_tags.sys_tags())
    except Exception:
        pass
    try:
        from pip._internal.utils.compatibility_tags import get_supported
        return list(get_supported())
    except Exception:
        return []

plat = sysconfig.get_platform()
tags = [
    {
        "python": str(tag.interpreter).lower(),
        "abi": str(tag.abi).lower(),
        "platform": str(tag.platform).lower(),
    }
    for tag in collect_tags()
]
if not tags:
    tag_plat = plat.lower().replace("-", "_").replace(".", "_")
    for py in [f"cp{major}{minor}", f"py{major}{minor}", f"py{major}"]:
        for abi in [f"cp{major}{minor}", "abi3", "none"]:
            for p in [tag_plat, "any"]:
                tags.append({"python": py, "abi": abi, "platform": p})
data = {
    "platform": plat,
    "tags": tags,
    "markers": {
        "implementation_name": getattr(sys.implementation, "name", "cpython"),
        "implementation_version": platform.python_version(),
        "os_name": os.name,
        "platform_machine": platform.machine(),
        "platform_python_implementation": platform.python_implementation(),
        "platform_release": platform.release(),
        "platform_system": platform.system(),
        "platform_version": platform.version(),
        "python_full_version": platform.python_version(),
        "python_version": f"{major}.{minor}",
        "sys_platform": sys.platform,
    },
}
print(json.dumps(data))
"#;

/// What the converter needs to know about the interpreter that will use the egg.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    pub supported: SupportedTags,
    /// `sysconfig.get_platform()`, e.g. `linux-x86_64`.
    pub platform: String,
    pub markers: MarkerEnvironment,
}

/// Locate the interpreter to probe.
///
/// # Errors
///
/// Returns an error when no interpreter is configured or on `PATH`.
pub fn detect_interpreter(config: &Config) -> Result<String> {
    if let Some(explicit) = config.python() {
        return Ok(explicit.to_string());
    }
    for candidate in ["python3", "python"] {
        if let Ok(path) = which(candidate) {
            return path
                .into_os_string()
                .into_string()
                .map_err(|_| anyhow!("non-utf8 path"));
        }
    }
    bail!("no python interpreter found; set WHEELEGG_PYTHON")
}

/// Probe `python` for its supported tags, platform, and marker environment.
///
/// # Errors
///
/// Returns an error when the interpreter cannot run or prints a malformed payload.
pub fn detect_host(python: &str, platform_override: Option<&str>) -> Result<HostEnvironment> {
    let output = Command::new(python)
        .arg("-c")
        .arg(HOST_SCRIPT)
        .output()
        .with_context(|| format!("failed to probe host environment via {python}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python host probe failed: {stderr}");
    }
    let payload: HostPayload = from_slice(&output.stdout).context("invalid host probe payload")?;
    let host = payload.into_host(platform_override)?;
    tracing::debug!(
        python,
        platform = %host.platform,
        tags = host.supported.len(),
        "probed host environment"
    );
    Ok(host)
}

/// Probe the interpreter selected by `config`.
pub fn current_host(config: &Config) -> Result<HostEnvironment> {
    let python = detect_interpreter(config)?;
    detect_host(&python, config.platform())
}

#[derive(Deserialize)]
struct HostPayload {
    platform: String,
    #[serde(default)]
    tags: Vec<SupportedTag>,
    markers: MarkerPayload,
}

#[derive(Deserialize)]
struct MarkerPayload {
    implementation_name: String,
    implementation_version: String,
    os_name: String,
    platform_machine: String,
    platform_python_implementation: String,
    platform_release: String,
    platform_system: String,
    platform_version: String,
    python_full_version: String,
    python_version: String,
    sys_platform: String,
}

impl HostPayload {
    fn into_host(self, platform_override: Option<&str>) -> Result<HostEnvironment> {
        let markers = self.markers;
        Ok(HostEnvironment {
            supported: self.tags.into_iter().collect(),
            platform: platform_override.map_or(self.platform, ToString::to_string),
            markers: MarkerEnvironment {
                implementation_name: markers.implementation_name,
                implementation_version: string_version(
                    &markers.implementation_version,
                    "implementation_version",
                )?,
                os_name: markers.os_name,
                platform_machine: markers.platform_machine,
                platform_python_implementation: markers.platform_python_implementation,
                platform_release: markers.platform_release,
                platform_system: markers.platform_system,
                platform_version: markers.platform_version,
                python_full_version: string_version(
                    &markers.python_full_version,
                    "python_full_version",
                )?,
                python_version: string_version(&markers.python_version, "python_version")?,
                sys_platform: markers.sys_platform,
            },
        })
    }
}

fn string_version(value: &str, field: &str) -> Result<StringVersion> {
    StringVersion::from_str(value)
        .map_err(|err| anyhow!("`{value}` is not a valid PEP 440 version for `{field}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheelegg_domain::WheelFilename;

    const PAYLOAD: &str = r##"{
        "platform": "linux-x86_64",
        "tags": [
            {"python": "cp312", "abi": "cp312", "platform": "manylinux_2_17_x86_64"},
            {"python": "py3", "abi": "none", "platform": "any"}
        ],
        "markers": {
            "implementation_name": "cpython",
            "implementation_version": "3.12.1",
            "os_name": "posix",
            "platform_machine": "x86_64",
            "platform_python_implementation": "CPython",
            "platform_release": "6.1.0",
            "platform_system": "Linux",
            "platform_version": "#1 SMP",
            "python_full_version": "3.12.1",
            "python_version": "3.12",
            "sys_platform": "linux"
        }
    }"##;

    #[test]
    fn payload_becomes_host_environment() -> Result<()> {
        let payload: HostPayload = serde_json::from_str(PAYLOAD)?;
        let host = payload.into_host(None)?;
        assert_eq!(host.platform, "linux-x86_64");
        assert_eq!(host.supported.len(), 2);
        assert_eq!(host.markers.sys_platform, "linux");

        let wheel = WheelFilename::parse("foo-1.0-py2.py3-none-any.whl")?;
        assert!(host.supported.is_compatible(wheel.tags()));
        Ok(())
    }

    #[test]
    fn platform_override_wins() -> Result<()> {
        let payload: HostPayload = serde_json::from_str(PAYLOAD)?;
        let host = payload.into_host(Some("manylinux2014-x86_64"))?;
        assert_eq!(host.platform, "manylinux2014-x86_64");
        Ok(())
    }

    #[test]
    fn invalid_marker_versions_are_rejected() {
        let broken = PAYLOAD.replace("\"3.12.1\"", "\"not-a-version\"");
        let payload: HostPayload = serde_json::from_str(&broken).expect("payload");
        assert!(payload.into_host(None).is_err());
    }
}
