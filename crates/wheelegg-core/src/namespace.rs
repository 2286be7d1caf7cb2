use std::fs;
use std::path::Path;

use wheelegg_domain::NAMESPACE_PACKAGES_FILE;

use crate::errors::InstallError;

/// `__init__.py` body for namespace packages shared between eggs.
pub const NAMESPACE_PACKAGE_INIT: &str = "\
try:
    __import__('pkg_resources').declare_namespace(__name__)
except ImportError:
    __path__ = __import__('pkgutil').extend_path(__path__, __name__)
";

/// Write the namespace shim into every declared namespace package directory
/// that exists under `egg_dir` without an `__init__.py`.
///
/// Returns the dotted names that received a shim.
pub fn fix_namespace_packages(egg_info: &Path, egg_dir: &Path) -> Result<Vec<String>, InstallError> {
    let listing = egg_info.join(NAMESPACE_PACKAGES_FILE);
    if !listing.exists() {
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(&listing).map_err(|err| InstallError::fs("read", &listing, err))?;
    let mut fixed = Vec::new();
    for module in contents.split_whitespace() {
        let module_dir = module
            .split('.')
            .fold(egg_dir.to_path_buf(), |path, part| path.join(part));
        let init = module_dir.join("__init__.py");
        if module_dir.exists() && !init.exists() {
            fs::write(&init, NAMESPACE_PACKAGE_INIT)
                .map_err(|err| InstallError::fs("write", &init, err))?;
            tracing::debug!(module, "wrote namespace package shim");
            fixed.push(module.to_string());
        }
    }
    Ok(fixed)
}
