use std::fs;
use std::path::{Path, PathBuf};

use pep508_rs::MarkerEnvironment;
use serde::Serialize;
use wheelegg_domain::{
    check_wheel_version, DistInfo, EggRequirements, HeaderMap, WheelFilename, WheelFormatError,
    EGG_INFO_DIR, METADATA_FILE, PKG_INFO_FILE, REQUIRES_FILE, WHEEL_FILE,
};

use crate::archive::WheelArchive;
use crate::errors::InstallError;
use crate::namespace::fix_namespace_packages;
use crate::relocate::relocate_data_dir;

/// Summary of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledEgg {
    pub egg_dir: PathBuf,
    pub dist_info: String,
    pub wheel_version: String,
    pub requirements: EggRequirements,
    pub scripts: Vec<String>,
    pub namespace_packages: Vec<String>,
}

/// Per-call naming state; nothing survives past one install.
struct ConversionContext<'a> {
    destination: &'a Path,
    dist_basename: String,
    dist_info: String,
}

impl ConversionContext<'_> {
    fn dist_info_dir(&self) -> PathBuf {
        self.destination.join(&self.dist_info)
    }

    fn egg_info_dir(&self) -> PathBuf {
        self.destination.join(EGG_INFO_DIR)
    }
}

/// Unpack `wheel` into `destination` as an egg directory.
///
/// `destination` must not exist yet. It is created before anything else and
/// left in place, possibly half-populated, when a later step fails.
pub fn install_as_egg(
    wheel: &WheelFilename,
    destination: &Path,
    markers: &MarkerEnvironment,
) -> Result<InstalledEgg, InstallError> {
    let (ctx, wheel_version) = {
        let mut archive = WheelArchive::open(&wheel.filename)?;
        fs::create_dir(destination)
            .map_err(|err| InstallError::fs("create", destination, err))?;

        let dist_info = archive.find_dist_info(&wheel.project_name)?;
        tracing::debug!(%dist_info, "located dist-info directory");
        let ctx = ConversionContext {
            destination,
            dist_basename: wheel.dist_basename(),
            dist_info,
        };

        let wheel_entry = format!("{}/{WHEEL_FILE}", ctx.dist_info);
        let contents =
            archive
                .read_entry(&wheel_entry)?
                .ok_or_else(|| WheelFormatError::WheelFileMissing {
                    dist_info: ctx.dist_info.clone(),
                })?;
        let headers = HeaderMap::parse(&String::from_utf8_lossy(&contents));
        let wheel_version = check_wheel_version(&headers)?.to_string();

        let extracted = archive.extract_all(destination)?;
        tracing::debug!(extracted, dest = %destination.display(), "extracted wheel");
        (ctx, wheel_version)
    };

    let requirements = read_requirements(&ctx.dist_info_dir(), markers)?;

    let egg_info = ctx.egg_info_dir();
    let dist_info_dir = ctx.dist_info_dir();
    fs::rename(&dist_info_dir, &egg_info)
        .map_err(|err| InstallError::fs("rename", &dist_info_dir, err))?;
    let metadata = egg_info.join(METADATA_FILE);
    fs::rename(&metadata, egg_info.join(PKG_INFO_FILE))
        .map_err(|err| InstallError::fs("rename", &metadata, err))?;

    let requires = egg_info.join(REQUIRES_FILE);
    fs::write(&requires, requirements.render())
        .map_err(|err| InstallError::fs("write", &requires, err))?;

    let scripts = relocate_data_dir(destination, &ctx.dist_basename, &egg_info)?;
    let namespace_packages = fix_namespace_packages(&egg_info, destination)?;

    tracing::info!(
        wheel = %wheel,
        egg = %destination.display(),
        scripts = scripts.len(),
        "converted wheel to egg"
    );
    Ok(InstalledEgg {
        egg_dir: destination.to_path_buf(),
        dist_info: ctx.dist_info,
        wheel_version,
        requirements,
        scripts,
        namespace_packages,
    })
}

fn read_requirements(
    dist_info_dir: &Path,
    markers: &MarkerEnvironment,
) -> Result<EggRequirements, InstallError> {
    let metadata = dist_info_dir.join(METADATA_FILE);
    let text =
        fs::read_to_string(&metadata).map_err(|err| InstallError::fs("read", &metadata, err))?;
    let dist = DistInfo::parse(&text)?;
    Ok(EggRequirements::from_dist(&dist, markers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io;

    use crate::namespace::NAMESPACE_PACKAGE_INIT;
    use crate::test_support::{marker_env, write_wheel};
    use tempfile::tempdir;

    fn entries(dir: &Path) -> io::Result<BTreeSet<String>> {
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    #[test]
    fn minimal_wheel_becomes_minimal_egg() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("foo-1.0-py3-none-any.whl");
        write_wheel(
            &path,
            &[
                ("foo/__init__.py", "VALUE = 1\n"),
                ("foo-1.0.dist-info/METADATA", "Metadata-Version: 2.1\nName: foo\nVersion: 1.0\n"),
                ("foo-1.0.dist-info/WHEEL", "Wheel-Version: 1.0\nRoot-Is-Purelib: true\n"),
            ],
        )?;
        let wheel = WheelFilename::parse(&path)?;
        let dest = dir.path().join("foo-1.0.egg");

        let installed = install_as_egg(&wheel, &dest, &marker_env())?;

        assert_eq!(entries(&dest)?, BTreeSet::from(["EGG-INFO".to_string(), "foo".to_string()]));
        assert_eq!(
            entries(&dest.join("EGG-INFO"))?,
            BTreeSet::from([
                "PKG-INFO".to_string(),
                "WHEEL".to_string(),
                "requires.txt".to_string()
            ])
        );
        assert_eq!(fs::read_to_string(dest.join("EGG-INFO/requires.txt"))?, "");
        assert!(fs::read_to_string(dest.join("EGG-INFO/PKG-INFO"))?.contains("Name: foo"));
        assert_eq!(fs::read_to_string(dest.join("foo/__init__.py"))?, "VALUE = 1\n");
        assert_eq!(installed.dist_info, "foo-1.0.dist-info");
        assert_eq!(installed.wheel_version, "1.0");
        assert!(installed.requirements.is_empty());
        Ok(())
    }

    #[test]
    fn full_wheel_is_translated_and_relocated() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("acme.tools-2.1-py3-none-any.whl");
        write_wheel(
            &path,
            &[
                ("acme/tools/__init__.py", ""),
                (
                    "acme.tools-2.1.dist-info/METADATA",
                    "Metadata-Version: 2.1\nName: acme.tools\nVersion: 2.1\nRequires-Dist: six\nRequires-Dist: colorama ; sys_platform == \"win32\"\nRequires-Dist: six ; extra == \"test\"\nRequires-Dist: pytest>=7 ; extra == \"test\"\nProvides-Extra: test\n",
                ),
                ("acme.tools-2.1.dist-info/WHEEL", "Wheel-Version: 1.1\n"),
                ("acme.tools-2.1.dist-info/namespace_packages.txt", "acme\n"),
                ("acme.tools-2.1.data/scripts/acme-run", "#!python\n"),
                ("acme.tools-2.1.data/scripts/acme-run.pyc", "\0"),
                ("acme.tools-2.1.data/purelib/acme/tools/extra.py", ""),
                ("acme.tools-2.1.data/data/share/acme/logo.txt", "logo"),
            ],
        )?;
        let wheel = WheelFilename::parse(&path)?;
        let dest = dir.path().join("acme.tools-2.1.egg");

        let installed = install_as_egg(&wheel, &dest, &marker_env())?;

        assert_eq!(
            fs::read_to_string(dest.join("EGG-INFO/requires.txt"))?,
            "six\n\n[test]\npytest>=7\n"
        );
        assert_eq!(installed.scripts, ["acme-run"]);
        assert!(dest.join("EGG-INFO/scripts/acme-run").is_file());
        assert!(dest.join("EGG-INFO/namespace_packages.txt").is_file());
        assert!(dest.join("acme/tools/extra.py").is_file());
        assert_eq!(fs::read_to_string(dest.join("share/acme/logo.txt"))?, "logo");
        assert!(!dest.join("acme.tools-2.1.data").exists());
        assert!(!dest.join("acme.tools-2.1.dist-info").exists());
        assert_eq!(
            fs::read_to_string(dest.join("acme/__init__.py"))?,
            NAMESPACE_PACKAGE_INIT
        );
        assert_eq!(installed.namespace_packages, ["acme"]);
        Ok(())
    }

    #[test]
    fn compiled_scripts_never_reach_the_egg() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("foo-1.0-py3-none-any.whl");
        write_wheel(
            &path,
            &[
                ("foo-1.0.dist-info/METADATA", "Name: foo\nVersion: 1.0\n"),
                ("foo-1.0.dist-info/WHEEL", "Wheel-Version: 1.0\n"),
                ("foo-1.0.data/scripts/run", "#!python\n"),
                ("foo-1.0.data/scripts/run.pyc", "\0"),
            ],
        )?;
        let wheel = WheelFilename::parse(&path)?;
        let dest = dir.path().join("egg");

        install_as_egg(&wheel, &dest, &marker_env())?;

        assert!(dest.join("EGG-INFO/scripts/run").is_file());
        let mut stack = vec![dest.clone()];
        while let Some(path) = stack.pop() {
            for entry in fs::read_dir(&path)? {
                let entry = entry?;
                assert_ne!(entry.file_name(), "run.pyc");
                if entry.file_type()?.is_dir() {
                    stack.push(entry.path());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn unsupported_format_fails_before_extraction() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("foo-1.0-py3-none-any.whl");
        write_wheel(
            &path,
            &[
                ("foo/__init__.py", ""),
                ("foo-1.0.dist-info/WHEEL", "Wheel-Version: 2.0\n"),
            ],
        )?;
        let wheel = WheelFilename::parse(&path)?;
        let dest = dir.path().join("egg");

        let err = install_as_egg(&wheel, &dest, &marker_env()).expect_err("2.0 rejected");

        assert!(matches!(
            err,
            InstallError::Format(WheelFormatError::UnsupportedVersion { .. })
        ));
        assert!(dest.is_dir());
        assert!(entries(&dest)?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_dist_info_is_a_format_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("foo-1.0-py3-none-any.whl");
        write_wheel(&path, &[("foo/__init__.py", "")])?;
        let wheel = WheelFilename::parse(&path)?;

        let err = install_as_egg(&wheel, &dir.path().join("egg"), &marker_env())
            .expect_err("no dist-info");

        assert!(matches!(
            err,
            InstallError::Format(WheelFormatError::DistInfoMissing { .. })
        ));
        assert!(err.is_user_error());
        Ok(())
    }

    #[test]
    fn missing_metadata_file_is_fatal() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("foo-1.0-py3-none-any.whl");
        write_wheel(
            &path,
            &[
                ("foo/__init__.py", ""),
                ("foo-1.0.dist-info/WHEEL", "Wheel-Version: 1.0\n"),
            ],
        )?;
        let wheel = WheelFilename::parse(&path)?;
        let dest = dir.path().join("egg");

        let err = install_as_egg(&wheel, &dest, &marker_env()).expect_err("no METADATA");

        match &err {
            InstallError::Filesystem { path, source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
                assert!(path.ends_with("foo-1.0.dist-info/METADATA"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_user_error());
        assert!(!dest.join("EGG-INFO").exists());
        Ok(())
    }

    #[test]
    fn existing_destination_is_refused() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("foo-1.0-py3-none-any.whl");
        write_wheel(&path, &[("foo-1.0.dist-info/WHEEL", "Wheel-Version: 1.0\n")])?;
        let wheel = WheelFilename::parse(&path)?;
        let dest = dir.path().join("egg");
        fs::create_dir(&dest)?;
        fs::write(dest.join("keep.txt"), "mine")?;

        let err = install_as_egg(&wheel, &dest, &marker_env()).expect_err("exists");

        match err {
            InstallError::Filesystem { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(dest.join("keep.txt"))?, "mine");
        Ok(())
    }
}
