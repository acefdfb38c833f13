use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::{ArchiveError, AUX_EXTENSION, CANONICAL_ENTRY_NAME};

/// A fully materialized archive ready for upload.
///
/// Entry 0 is always the primary cache file under [`CANONICAL_ENTRY_NAME`];
/// any following entries are auxiliary WDB files, flat by basename.
#[derive(Debug)]
pub struct ArchivePayload {
    bytes: Vec<u8>,
    entry_names: Vec<String>,
}

impl ArchivePayload {
    /// The compressed archive bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the payload, returning the archive bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> &[String] {
        &self.entry_names
    }

    /// Number of entries in the archive.
    pub fn entry_count(&self) -> usize {
        self.entry_names.len()
    }
}

/// Resolves the auxiliary WDB directory for a primary cache file.
///
/// The cache layout is `<channel>/Cache/ADB/<locale>/DBCache.bin` with the
/// matching WDB caches at `<channel>/Cache/WDB/<locale>`: two levels up from
/// the primary's parent, then into `WDB` under the same locale name.
pub fn aux_dir_for(primary: &Path) -> Option<PathBuf> {
    let locale_dir = primary.parent()?;
    let locale = locale_dir.file_name()?;
    let cache_dir = locale_dir.parent()?.parent()?;
    Some(cache_dir.join("WDB").join(locale))
}

/// Builds the upload archive for `primary`.
///
/// The primary file is opened shared-read (the game may still hold it open
/// for append) and written as the first entry. Every `*.wdb` file in the
/// auxiliary directory is then added flat, in sorted filename order. A
/// missing auxiliary directory is not an error.
pub fn build(primary: &Path) -> Result<ArchivePayload, ArchiveError> {
    let mut cache_file =
        std::fs::File::open(primary).map_err(|source| ArchiveError::FileUnavailable {
            path: primary.display().to_string(),
            source,
        })?;

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default();
    let mut entry_names = Vec::new();

    zip.start_file(CANONICAL_ENTRY_NAME, options)?;
    std::io::copy(&mut cache_file, &mut zip)?;
    entry_names.push(CANONICAL_ENTRY_NAME.to_string());

    if let Some(aux_dir) = aux_dir_for(primary) {
        for aux_path in aux_files(&aux_dir) {
            let Some(name) = aux_path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let mut aux_file = match std::fs::File::open(&aux_path) {
                Ok(f) => f,
                Err(e) => {
                    // Best-effort: the game may be rewriting a WDB right now.
                    tracing::warn!(
                        file = %aux_path.display(),
                        error = %e,
                        "skipping unreadable auxiliary file"
                    );
                    continue;
                }
            };
            zip.start_file(name, options)?;
            std::io::copy(&mut aux_file, &mut zip)?;
            entry_names.push(name.to_string());
        }
    }

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(
        entries = entry_names.len(),
        size = bytes.len(),
        "archive built"
    );

    Ok(ArchivePayload { bytes, entry_names })
}

/// Lists `*.wdb` files in `dir`, sorted by name for deterministic entry order.
fn aux_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(AUX_EXTENSION))
        })
        .collect();

    files.sort_unstable();
    files
}
