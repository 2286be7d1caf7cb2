use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use pep508_rs::{MarkerEnvironment, StringVersion};
use std::str::FromStr;
use wheelegg_domain::{SupportedTag, SupportedTags};

use crate::host::HostEnvironment;

/// Write a zip with the given `(name, contents)` entries; names ending in `/` become directories.
pub(crate) fn write_wheel(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(contents.as_bytes())?;
        }
    }
    writer.finish()?;
    Ok(())
}

pub(crate) fn marker_env() -> MarkerEnvironment {
    MarkerEnvironment {
        implementation_name: "cpython".into(),
        implementation_version: StringVersion::from_str("3.12.0").expect("impl version"),
        os_name: "posix".into(),
        platform_machine: "x86_64".into(),
        platform_python_implementation: "CPython".into(),
        platform_release: "6.0".into(),
        platform_system: "Linux".into(),
        platform_version: "6.0".into(),
        python_full_version: StringVersion::from_str("3.12.0").expect("full version"),
        python_version: StringVersion::from_str("3.12").expect("python version"),
        sys_platform: "linux".into(),
    }
}

pub(crate) fn linux_host() -> HostEnvironment {
    HostEnvironment {
        supported: [
            ("cp312", "cp312", "linux_x86_64"),
            ("cp312", "abi3", "linux_x86_64"),
            ("py3", "none", "linux_x86_64"),
            ("py3", "none", "any"),
        ]
        .iter()
        .map(|(py, abi, plat)| SupportedTag::new(py, abi, plat))
        .collect::<SupportedTags>(),
        platform: "linux-x86_64".into(),
        markers: marker_env(),
    }
}
