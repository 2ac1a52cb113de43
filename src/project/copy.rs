//! Copy policies for support files
//!
//! Two directory policies exist and are deliberately kept apart:
//! [`merge_into_subtree`] adds files to a directory and leaves unrelated
//! files alone, while [`replace_subtree`] makes the destination an exact
//! mirror of the source.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::WriterError;

/// Create a directory and its parents; succeeds if it already exists
pub fn ensure_dir(path: &Path) -> Result<(), WriterError> {
    fs::create_dir_all(path).map_err(|e| WriterError::filesystem(path, e))
}

/// Copy a single file, overwriting the destination
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), WriterError> {
    if !src.is_file() {
        return Err(WriterError::asset_missing(src, not_found(src)));
    }
    fs::copy(src, dst).map_err(|e| WriterError::filesystem(dst, e))?;
    Ok(())
}

/// Copy the files of `src` with the given extension into `dst`
///
/// Only the top level of `src` is considered. `dst` is created if absent;
/// files already in `dst` are overwritten when the source has a file of the
/// same name and kept otherwise. Returns the written paths, sorted.
pub fn merge_into_subtree(
    src: &Path,
    dst: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, WriterError> {
    if !src.is_dir() {
        return Err(WriterError::asset_missing(src, not_found(src)));
    }
    ensure_dir(dst)?;

    let mut written = Vec::new();
    for entry in WalkDir::new(src)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let target = dst.join(entry.file_name());
        copy_file(entry.path(), &target)?;
        written.push(target);
    }
    Ok(written)
}

/// Replace `dst` with a deep copy of `src`
///
/// The source is checked before anything is removed, so a missing asset
/// never destroys an existing destination.
pub fn replace_subtree(src: &Path, dst: &Path) -> Result<(), WriterError> {
    if !src.is_dir() {
        return Err(WriterError::asset_missing(src, not_found(src)));
    }
    if dst.exists() {
        fs::remove_dir_all(dst).map_err(|e| WriterError::filesystem(dst, e))?;
    }

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| WriterError::filesystem(entry.path(), io::Error::other(e)))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

fn walk_error(root: &Path, err: walkdir::Error) -> WriterError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    WriterError::filesystem(path, err.into())
}
