//! Directory traversal producing the ordered list of files to include.

use crate::error::Result;
use crate::patterns::PatternMatcher;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// One file selected for inclusion: the slash-normalized path used for
/// matching and display, and the path actually opened to read content (these
/// differ in spirit when the file is reached through a symlink).
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub relative_path: String,
    pub read_path: PathBuf,
}

/// Walks `root` and returns the files to include, sorted lexicographically
/// by relative path so output is deterministic across runs.
///
/// Excluded directories are pruned from descent entirely. Symbolic links are
/// never entered or emitted unless `follow_symlinks` is set; with it set, a
/// link to a directory is traversed (but not emitted) and a link to a file
/// is emitted like a regular file. Unreadable entries and symlink cycles are
/// skipped with a warning rather than aborting the walk.
pub fn walk(
    root: &Path,
    matcher: &PatternMatcher,
    follow_symlinks: bool,
) -> Result<Vec<FileEntry>> {
    log::debug!(
        "Walking {} (follow_symlinks: {})",
        root.display(),
        follow_symlinks
    );

    let iter = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !follow_symlinks && entry.path_is_symlink() {
                log::trace!("Skipping symlink: {}", entry.path().display());
                return false;
            }
            if entry.file_type().is_dir() {
                match normalize_relative(root, entry.path()) {
                    Some(rel) if matcher.is_ignored(&rel, true) => {
                        log::trace!("Pruning excluded directory: {}", rel);
                        return false;
                    }
                    _ => {}
                }
            }
            true
        });

    let mut entries = Vec::new();
    for result in iter {
        let entry = match result {
            Ok(entry) => entry,
            // Permission errors, racing deletions and symlink loops end the
            // affected branch; the rest of the walk continues.
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        if entry.depth() == 0 || entry.file_type().is_dir() {
            continue;
        }

        let Some(relative_path) = normalize_relative(root, entry.path()) else {
            log::warn!(
                "Could not determine relative path for: {}",
                entry.path().display()
            );
            continue;
        };

        if matcher.is_ignored(&relative_path, false) {
            log::trace!("Excluding file: {}", relative_path);
            continue;
        }

        entries.push(FileEntry {
            relative_path,
            read_path: entry.into_path(),
        });
    }

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::debug!("Walk complete, {} files selected", entries.len());
    Ok(entries)
}

/// Computes `path` relative to `root` with forward-slash separators,
/// regardless of the host path-separator convention.
fn normalize_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = pathdiff::diff_paths(path, root)?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
