use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use wheelegg_domain::{canonicalize_name, WheelFormatError};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::errors::InstallError;

const DIST_INFO_SUFFIX: &str = ".dist-info";

/// An open wheel. The file handle lives exactly as long as this value.
pub struct WheelArchive {
    path: PathBuf,
    archive: ZipArchive<File>,
    names: Vec<String>,
}

impl WheelArchive {
    pub fn open(path: &Path) -> Result<Self, InstallError> {
        let file = File::open(path).map_err(|err| InstallError::fs("open", path, err))?;
        let mut archive =
            ZipArchive::new(file).map_err(|err| InstallError::archive(path, err))?;
        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|err| InstallError::archive(path, err))?;
            names.push(entry.name().to_string());
        }
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            names,
        })
    }

    /// Entry names in central-directory order.
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// The first top-level `*.dist-info` directory belonging to `project_name`.
    pub fn find_dist_info(&self, project_name: &str) -> Result<String, WheelFormatError> {
        let project = canonicalize_name(project_name);
        self.names
            .iter()
            .filter_map(|name| name.rsplit_once('/').map(|(dir, _)| dir))
            .find(|dir| {
                !dir.contains('/')
                    && dir.ends_with(DIST_INFO_SUFFIX)
                    && canonicalize_name(dir).starts_with(&project)
            })
            .map(ToString::to_string)
            .ok_or_else(|| WheelFormatError::DistInfoMissing {
                project: project_name.to_string(),
            })
    }

    /// Read one entry fully; `Ok(None)` when the archive has no such entry.
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, InstallError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(InstallError::archive(&self.path, err)),
        };
        let mut contents = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut contents)
            .map_err(|err| InstallError::fs("read", self.path.join(name), err))?;
        Ok(Some(contents))
    }

    /// Extract every entry under `dest`, keeping the archive layout.
    ///
    /// Entries that would land outside `dest` are skipped.
    pub fn extract_all(&mut self, dest: &Path) -> Result<usize, InstallError> {
        let mut written = 0;
        for index in 0..self.archive.len() {
            let mut entry = self
                .archive
                .by_index(index)
                .map_err(|err| InstallError::archive(&self.path, err))?;
            let Some(enclosed) = entry.enclosed_name().map(|p| dest.join(p)) else {
                tracing::debug!(entry = entry.name(), "skipping entry outside the egg directory");
                continue;
            };
            if entry.name().ends_with('/') || entry.is_dir() {
                fs::create_dir_all(&enclosed)
                    .map_err(|err| InstallError::fs("create", &enclosed, err))?;
                continue;
            }
            if let Some(parent) = enclosed.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| InstallError::fs("create", parent, err))?;
            }
            let mut outfile =
                File::create(&enclosed).map_err(|err| InstallError::fs("create", &enclosed, err))?;
            io::copy(&mut entry, &mut outfile)
                .map_err(|err| InstallError::fs("write", &enclosed, err))?;
            #[cfg(unix)]
            {
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&enclosed, fs::Permissions::from_mode(mode))
                        .map_err(|err| InstallError::fs("chmod", &enclosed, err))?;
                }
            }
            written += 1;
        }
        Ok(written)
    }
}
