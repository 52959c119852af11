//! Read-only I/O over the mirrored tree
//!
//! Every query re-walks the filesystem; nothing here caches.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Maximum file size for content reads (10 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read a file as text, refusing files larger than `limit` bytes.
///
/// Invalid UTF-8 is replaced rather than rejected so a stray binary byte
/// does not hide the rest of a source file.
pub fn read_text_bounded(path: &Path, limit: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if metadata.len() > limit {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit,
        });
    }

    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::debug!(path = %path.display(), "File is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// List the regular files directly inside `dir`, sorted by file name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |ft| ft.is_file())
}

/// List the subdirectories directly inside `dir`, sorted by name.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |ft| ft.is_dir())
}

fn list_entries(dir: &Path, keep: impl Fn(&fs::FileType) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        // Follow symlinks so a linked file still counts as a file.
        let file_type = match fs::metadata(entry.path()) {
            Ok(meta) => meta.file_type(),
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if keep(&file_type) {
            entries.push(entry.path());
        }
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// File name of `path` as an owned string (lossy on non-UTF-8 names).
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lower-cased text after the last `.` of the file name, or `""`.
///
/// Unlike [`Path::extension`], a dotfile such as `.editorconfig` has type
/// `editorconfig`.
pub fn file_type_of(path: &Path) -> String {
    let name = file_name_of(path);
    name.rfind('.')
        .map(|idx| name[idx + 1..].to_lowercase())
        .unwrap_or_default()
}
