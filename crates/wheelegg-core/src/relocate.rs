//! Moving `.data` payloads into their egg locations.

use std::fs;
use std::io;
use std::path::Path;

use crate::errors::InstallError;

/// Subdirectories of `<dist>.data` whose contents belong at the egg root.
pub const DATA_SCHEMES: [&str; 4] = ["data", "headers", "purelib", "platlib"];

const SCRIPTS_DIR: &str = "scripts";
const BYTECODE_SUFFIX: &str = ".pyc";

/// Move `<data>/scripts/*` into `<egg_info>/scripts`, deleting compiled bytecode.
///
/// Returns the relocated entry names, sorted.
pub fn relocate_scripts(data_dir: &Path, egg_info: &Path) -> Result<Vec<String>, InstallError> {
    let source = data_dir.join(SCRIPTS_DIR);
    if !source.is_dir() {
        return Ok(Vec::new());
    }
    let target = egg_info.join(SCRIPTS_DIR);
    fs::create_dir(&target).map_err(|err| InstallError::fs("create", &target, err))?;
    let mut moved = Vec::new();
    for entry in fs::read_dir(&source).map_err(|err| InstallError::fs("list", &source, err))? {
        let entry = entry.map_err(|err| InstallError::fs("list", &source, err))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(BYTECODE_SUFFIX) {
            tracing::debug!(script = %name, "dropping compiled script");
            fs::remove_file(&path).map_err(|err| InstallError::fs("remove", &path, err))?;
            continue;
        }
        let dest = target.join(entry.file_name());
        fs::rename(&path, &dest).map_err(|err| InstallError::fs("move", &path, err))?;
        moved.push(name);
    }
    fs::remove_dir(&source).map_err(|err| InstallError::fs("remove", &source, err))?;
    moved.sort();
    Ok(moved)
}

/// Move everything under `src` into `dst`, then delete `src`.
///
/// Directories missing from `dst` are renamed across whole; existing ones are
/// descended into. Files replace whatever is at their destination.
pub fn merge_tree(src: &Path, dst: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dst).map_err(|err| InstallError::fs("create", dst, err))?;
    for entry in fs::read_dir(src).map_err(|err| InstallError::fs("list", src, err))? {
        let entry = entry.map_err(|err| InstallError::fs("list", src, err))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|err| InstallError::fs("stat", &from, err))?;
        if file_type.is_dir() && to.is_dir() {
            merge_tree(&from, &to)?;
            continue;
        }
        if file_type.is_dir() && to.exists() {
            return Err(InstallError::fs(
                "merge",
                &to,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "a file is in the way of a directory",
                ),
            ));
        }
        fs::rename(&from, &to).map_err(|err| InstallError::fs("move", &from, err))?;
    }
    fs::remove_dir(src).map_err(|err| InstallError::fs("remove", src, err))
}

/// Relocate `<dist_basename>.data` under `egg_dir`; returns relocated script names.
pub fn relocate_data_dir(
    egg_dir: &Path,
    dist_basename: &str,
    egg_info: &Path,
) -> Result<Vec<String>, InstallError> {
    let data_dir = egg_dir.join(format!("{dist_basename}.data"));
    if !data_dir.exists() {
        return Ok(Vec::new());
    }
    let scripts = relocate_scripts(&data_dir, egg_info)?;
    for scheme in DATA_SCHEMES {
        let subdir = data_dir.join(scheme);
        if subdir.exists() {
            tracing::debug!(scheme, "merging data scheme into egg root");
            merge_tree(&subdir, egg_dir)?;
        }
    }
    fs::remove_dir(&data_dir).map_err(|err| InstallError::fs("remove", &data_dir, err))?;
    Ok(scripts)
}
