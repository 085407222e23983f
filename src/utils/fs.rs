// src/utils/fs.rs

//! File system utilities.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Write bytes atomically (write to temp, then rename).
///
/// A failed write leaves any existing file at `path` untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;

    let tmp = path.with_extension("tmp");
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Save data to a JSON file with pretty printing.
pub fn save_json<T: serde::Serialize + ?Sized>(path: &Path, data: &T) -> io::Result<()> {
    let bytes = serde_json::to_vec_pretty(data).map_err(io::Error::other)?;
    write_atomic(path, &bytes)
}
