use crate::filename::WheelFilename;
use crate::names::to_filename;

pub const EGG_INFO_DIR: &str = "EGG-INFO";
pub const PKG_INFO_FILE: &str = "PKG-INFO";
pub const REQUIRES_FILE: &str = "requires.txt";
pub const NAMESPACE_PACKAGES_FILE: &str = "namespace_packages.txt";

/// Directory name of the egg a wheel converts into.
///
/// Pure wheels (`platform == "any"`) carry no platform segment; anything
/// else is stamped with the host's platform descriptor.
pub fn egg_name(wheel: &WheelFilename, host_platform: &str) -> String {
    let mut name = format!(
        "{}-{}",
        to_filename(&wheel.project_name),
        to_filename(&wheel.version)
    );
    if !wheel.is_pure() {
        name.push('-');
        name.push_str(host_platform);
    }
    name.push_str(".egg");
    name
}
