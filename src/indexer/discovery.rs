use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Prefix and extension of files Codex writes for each session
const ROLLOUT_PREFIX: &str = "rollout-";
const ROLLOUT_EXTENSION: &str = ".jsonl";

/// Recursively find `rollout-*.jsonl` files under `sessions_root`
///
/// Returns the paths sorted, so that the `YYYY/MM/DD` layout yields oldest
/// first. A missing root is not an error: it yields an empty list.
///
/// Directory entries that cannot be read are logged and skipped. Symlinks are
/// not followed.
pub fn find_rollout_files(sessions_root: &Path) -> Vec<PathBuf> {
    if !sessions_root.exists() {
        tracing::info!(root = %sessions_root.display(), "sessions root not found");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(sessions_root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %sessions_root.display(), "Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with(ROLLOUT_PREFIX) && name.ends_with(ROLLOUT_EXTENSION) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files
}
