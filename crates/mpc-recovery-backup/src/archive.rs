//! Zip archive access
//!
//! Entries are visited in archive order; directory entries are skipped.

use std::io::{Cursor, Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::BackupError;

/// Feed every file entry to `visit` until it returns `Some`.
///
/// Errors from `visit` stop the walk immediately.
pub fn find_entry<R, T, F>(reader: R, mut visit: F) -> Result<Option<T>, BackupError>
where
    R: Read + Seek,
    F: FnMut(&str, &[u8]) -> Result<Option<T>, BackupError>,
{
    let mut archive =
        ZipArchive::new(reader).map_err(|e| BackupError::Archive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| BackupError::Archive(e.to_string()))?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| BackupError::Archive(format!("{}: {}", name, e)))?;

        if let Some(found) = visit(&name, &contents)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Write `(name, contents)` pairs as a zip archive.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    entries: &[(&str, &[u8])],
) -> Result<W, BackupError> {
    let mut zip = ZipWriter::new(writer);
    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default())
            .map_err(|e| BackupError::Archive(e.to_string()))?;
        zip.write_all(contents)
            .map_err(|e| BackupError::Archive(e.to_string()))?;
    }
    zip.finish().map_err(|e| BackupError::Archive(e.to_string()))
}

/// In-memory variant of [`write_archive`].
pub fn build_archive(entries: &[(&str, &[u8])]) -> Result<Vec<u8>, BackupError> {
    Ok(write_archive(Cursor::new(Vec::new()), entries)?.into_inner())
}
