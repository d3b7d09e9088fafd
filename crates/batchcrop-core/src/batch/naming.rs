//! Collision-resolved output file names.
//!
//! An output keeps its source's file name. If that name is taken in the
//! output directory, `_crop1`, `_crop2`, ... is inserted before the extension
//! until a free name is found.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// The `n`-th candidate name for `file_name`; `n == 0` is the name itself.
pub fn candidate_name(file_name: &str, n: u32) -> String {
    if n == 0 {
        return file_name.to_string();
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}_crop{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_crop{}", stem, n),
    }
}

/// First candidate path in `dir` that does not exist yet.
///
/// This only looks; another writer may take the name before it is used.
/// [`claim_output_file`] is the race-free variant.
pub fn resolve_output_path(dir: &Path, file_name: &str) -> PathBuf {
    (0..)
        .map(|n| dir.join(candidate_name(file_name, n)))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join(file_name))
}

/// Create the first free candidate file in `dir`.
///
/// Each candidate is created with create-new semantics, so concurrent callers
/// can never both claim the same name: the loser sees `AlreadyExists` and
/// moves on to the next suffix.
pub fn claim_output_file(dir: &Path, file_name: &str) -> io::Result<(PathBuf, File)> {
    for n in 0..=u32::MAX {
        let path = dir.join(candidate_name(file_name, n));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free output name for {}", file_name),
    ))
}
