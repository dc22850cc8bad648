//! Workspace marker-file discovery.

use std::path::{Path, PathBuf};

/// Walks from `start_dir` towards the filesystem root looking for a file
/// named `file_name`, returning the directory that contains it.
///
/// Used by the launch guard to locate project manifests such as
/// `Cargo.toml` above an open document's folder.
#[must_use]
pub fn find_marker(start_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start_dir;
    loop {
        if current.join(file_name).is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}
