//! Name normalization shared by dist-info discovery and legacy naming.

/// Canonical project name: runs of `-`, `_`, `.` collapse to one `-`, lowercased.
pub fn canonicalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Legacy extra name: runs outside `[A-Za-z0-9.-]` become `_`, lowercased.
pub fn safe_extra(extra: &str) -> String {
    let mut out = String::with_capacity(extra.len());
    let mut in_run = false;
    for ch in extra.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-') {
            out.push(ch.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Escape a name or version for use as one component of an egg filename.
pub fn to_filename(component: &str) -> String {
    component.replace('-', "_")
}
