//! Executable lookup over an explicit search path.
//!
//! Pure over the supplied PATH string so callers can test lookup behaviour
//! without mutating the process environment.

use std::path::{Path, PathBuf};

/// Locates an executable by name on the given search-path value.
///
/// `path_value` is the raw value of the OS search-path variable
/// (`PATH`), split with the platform separator. A name containing a path
/// separator is treated as a direct candidate and checked as-is. Returns
/// the first matching executable file, or `None` when the name cannot be
/// located.
#[must_use]
pub fn find_in_path(name: &str, path_value: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return is_executable_file(direct).then(|| direct.to_path_buf());
    }

    std::env::split_paths(path_value)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
