use std::{fs, io, path::Path};

use spdlog::debug;

/// Removes `path` and everything below it, depth first, one node at a time.
///
/// Failures on individual nodes are logged and skipped, so the walk always
/// finishes. A directory that cannot be listed is still tried as a direct
/// delete. Returns how many nodes were left behind; a missing path is a
/// no-op returning 0.
pub fn reset_best_effort(path: &Path) -> usize {
    match fs::symlink_metadata(path) {
        Ok(_) => remove_node(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => {
            debug!("cannot stat {}: {}", path.display(), e);
            0
        }
    }
}

fn remove_node(path: &Path) -> usize {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return remove_direct(path),
    };

    let mut left = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("failed to list entry under {}: {}", path.display(), e);
                left += 1;
                continue;
            }
        };
        let child = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            left += remove_node(&child);
        } else if let Err(e) = fs::remove_file(&child) {
            debug!("failed to remove {}: {}", child.display(), e);
            left += 1;
        }
    }

    if let Err(e) = fs::remove_dir(path) {
        debug!("failed to remove directory {}: {}", path.display(), e);
        left += 1;
    }
    left
}

fn remove_direct(path: &Path) -> usize {
    if fs::remove_file(path).is_ok() {
        return 0;
    }
    match fs::remove_dir(path) {
        Ok(()) => 0,
        Err(e) => {
            debug!("failed to remove {}: {}", path.display(), e);
            1
        }
    }
}
