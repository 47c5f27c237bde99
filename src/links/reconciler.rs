//! Symlink creation and broken-link cleanup for library trees.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::LinkError;

/// Link `source_file` into `dest_dir` under its own file name.
///
/// The link target is relative to `dest_dir`, so a library tree stays valid
/// when source and destination are moved together. Returns the link path, or
/// `None` when something already occupies it.
///
/// # Errors
///
/// Returns `LinkError::CreateDir` if `dest_dir` cannot be created, and other
/// `LinkError` variants if the target cannot be resolved or the link cannot
/// be written.
pub fn create_link(source_file: &Path, dest_dir: &Path) -> Result<Option<PathBuf>, LinkError> {
    fs::create_dir_all(dest_dir).map_err(|source| LinkError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let name = source_file
        .file_name()
        .ok_or_else(|| LinkError::NoFileName(source_file.to_path_buf()))?;
    let link = dest_dir.join(name);

    if fs::symlink_metadata(&link).is_ok() {
        tracing::debug!(link = %link.display(), "Link already exists, skipping");
        return Ok(None);
    }

    let target = relative_target(source_file, dest_dir)?;
    match symlink(&target, &link) {
        Ok(()) => {
            tracing::debug!(
                link = %link.display(),
                target = %target.display(),
                "Created symlink"
            );
            Ok(Some(link))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::debug!(link = %link.display(), "Link appeared concurrently, skipping");
            Ok(None)
        }
        Err(source) => Err(LinkError::Symlink { link, source }),
    }
}

/// Whether `path` is a symlink whose target does not exist.
///
/// Regular files, directories and missing paths are never broken. The
/// target is resolved relative to the directory holding the link. A target
/// that cannot be resolved at all (a link cycle, or a path running through a
/// regular file) counts as missing; a permission error does not.
#[must_use]
pub fn is_broken(path: &Path) -> bool {
    let is_symlink = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_symlink {
        return false;
    }

    match fs::metadata(path) {
        Ok(_) => false,
        Err(e) => e.kind() != io::ErrorKind::PermissionDenied,
    }
}

/// Remove broken symlinks under `dest_root` and prune emptied directories.
///
/// The tree is walked bottom-up, so a directory is only checked once all of
/// its entries were handled. `dest_root` itself is never removed, and
/// nothing that is not a symlink is ever deleted. Returns the number of
/// links removed.
pub fn sweep_broken(dest_root: &Path) -> usize {
    let mut removed = 0usize;

    for entry in WalkDir::new(dest_root).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %dest_root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();

        if entry.file_type().is_dir() {
            if path != dest_root {
                remove_if_empty(path);
            }
            continue;
        }

        if entry.path_is_symlink() && is_broken(path) {
            match fs::remove_file(path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Removed broken symlink");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove broken symlink");
                }
            }
        }
    }

    removed
}

fn remove_if_empty(dir: &Path) {
    let empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if !empty {
        return;
    }
    match fs::remove_dir(dir) {
        Ok(()) => tracing::info!(path = %dir.display(), "Removed empty directory"),
        Err(e) => tracing::debug!(path = %dir.display(), error = %e, "Could not remove directory"),
    }
}

/// Path of `source_file` as seen from `dest_dir`.
///
/// Both directories are canonicalized first so the result is free of `..`
/// detours through symlinked parents. The file name itself is kept, so a
/// source that is itself a symlink is linked to, not followed.
fn relative_target(source_file: &Path, dest_dir: &Path) -> Result<PathBuf, LinkError> {
    let name = source_file
        .file_name()
        .ok_or_else(|| LinkError::NoFileName(source_file.to_path_buf()))?;
    let source_dir = match source_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let source_dir = canonical(source_dir)?;
    let dest_dir = canonical(dest_dir)?;
    let source = source_dir.join(name);

    pathdiff::diff_paths(&source, &dest_dir).ok_or(LinkError::NoRelativePath {
        from: dest_dir,
        to: source,
    })
}

fn canonical(path: &Path) -> Result<PathBuf, LinkError> {
    path.canonicalize().map_err(|source| LinkError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
