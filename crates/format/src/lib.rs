//! DBCache binary format validation.
//!
//! The game writes hotfix caches with a fixed 4-byte signature. Anything
//! renamed into the cache directory that does not carry it is rejected
//! before any packaging or network work happens.

use std::io::{Read, Seek, SeekFrom};

/// Magic signature at offset 0 of every valid cache file.
pub const CACHE_MAGIC: [u8; 4] = *b"XFTH";

/// Errors produced by format validation.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid cache signature: expected {:?}, found {found:?}", CACHE_MAGIC)]
    InvalidMagic { found: [u8; 4] },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks that `reader` starts with [`CACHE_MAGIC`].
///
/// Reads exactly the first 4 bytes and rewinds to offset 0, so the caller
/// can re-read the full content afterward. A source shorter than 4 bytes
/// cannot start with the signature and fails with `InvalidMagic`.
pub fn validate<R: Read + Seek>(reader: &mut R) -> Result<(), FormatError> {
    reader.seek(SeekFrom::Start(0))?;

    let mut found = [0u8; 4];
    let mut filled = 0;
    while filled < found.len() {
        let n = reader.read(&mut found[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    reader.seek(SeekFrom::Start(0))?;

    if filled < found.len() || found != CACHE_MAGIC {
        return Err(FormatError::InvalidMagic { found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn valid_magic_accepted() {
        let mut cursor = Cursor::new(b"XFTHrest of the cache".to_vec());
        assert!(validate(&mut cursor).is_ok());
    }

    #[test]
    fn magic_only_accepted() {
        let mut cursor = Cursor::new(b"XFTH".to_vec());
        assert!(validate(&mut cursor).is_ok());
    }

    #[test]
    fn wrong_magic_rejected() {
        let mut cursor = Cursor::new(b"MPQ\x1acontent".to_vec());
        let err = validate(&mut cursor).unwrap_err();
        assert!(matches!(err, FormatError::InvalidMagic { .. }));
    }

    #[test]
    fn short_file_rejected() {
        let mut cursor = Cursor::new(b"XF".to_vec());
        let err = validate(&mut cursor).unwrap_err();
        assert!(matches!(err, FormatError::InvalidMagic { .. }));
    }

    #[test]
    fn empty_file_rejected() {
        let mut cursor = Cursor::new(Vec::new());
        let err = validate(&mut cursor).unwrap_err();
        assert!(matches!(err, FormatError::InvalidMagic { .. }));
    }

    #[test]
    fn position_reset_after_success() {
        let mut cursor = Cursor::new(b"XFTHpayload".to_vec());
        validate(&mut cursor).unwrap();

        let mut content = Vec::new();
        cursor.read_to_end(&mut content).unwrap();
        assert_eq!(&content, b"XFTHpayload");
    }

    #[test]
    fn position_reset_after_failure() {
        let mut cursor = Cursor::new(b"BADMAGIC".to_vec());
        let _ = validate(&mut cursor);

        let mut content = Vec::new();
        cursor.read_to_end(&mut content).unwrap();
        assert_eq!(&content, b"BADMAGIC");
    }

    #[test]
    fn validation_is_idempotent() {
        let mut cursor = Cursor::new(b"XFTHdata".to_vec());
        assert!(validate(&mut cursor).is_ok());
        assert!(validate(&mut cursor).is_ok());

        let mut cursor = Cursor::new(b"nope".to_vec());
        assert!(validate(&mut cursor).is_err());
        assert!(validate(&mut cursor).is_err());
    }

    #[test]
    fn validates_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DBCache.bin");
        std::fs::write(&path, b"XFTH\x01\x02\x03").unwrap();

        let mut file = std::fs::File::open(&path).unwrap();
        assert!(validate(&mut file).is_ok());
    }
}
