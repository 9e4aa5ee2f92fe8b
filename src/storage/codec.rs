//! Binary framing for artifact files.
//!
//! Layout (little-endian):
//!
//! ```text
//! magic    [u8; 4]  "SPLN"
//! version  u16
//! kind     u8
//! length   u64      payload length in bytes
//! checksum u32      CRC32 of the payload
//! payload  [u8]     bincode-encoded object
//! ```

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, SpamlensError};

/// File magic.
pub const MAGIC: [u8; 4] = *b"SPLN";

/// Current framing version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 4 + 2 + 1 + 8 + 4;

/// What an artifact file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArtifactKind {
    Extractor = 1,
    Classifier = 2,
}

impl ArtifactKind {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ArtifactKind::Extractor),
            2 => Some(ArtifactKind::Classifier),
            _ => None,
        }
    }
}

/// Encode an object into a framed artifact.
pub fn encode<T: Serialize>(kind: ArtifactKind, value: &T) -> Result<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| SpamlensError::serialization(format!("Failed to encode {kind:?}: {e}")))?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.write_all(&MAGIC)?;
    out.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    out.write_u8(kind as u8)?;
    out.write_u64::<LittleEndian>(payload.len() as u64)?;
    out.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    out.write_all(&payload)?;
    Ok(out)
}

/// Decode a framed artifact, checking header, length and checksum.
///
/// Errors are returned as a plain reason; the caller attaches the path.
pub fn decode<T: DeserializeOwned>(
    kind: ArtifactKind,
    bytes: &[u8],
) -> std::result::Result<T, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!(
            "file is {} bytes, shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        ));
    }

    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic).map_err(|e| e.to_string())?;
    if magic != MAGIC {
        return Err("bad magic".to_string());
    }

    let version = cursor
        .read_u16::<LittleEndian>()
        .map_err(|e| e.to_string())?;
    if version != FORMAT_VERSION {
        return Err(format!("unsupported format version {version}"));
    }

    let found = cursor.read_u8().map_err(|e| e.to_string())?;
    match ArtifactKind::from_u8(found) {
        Some(k) if k == kind => {}
        Some(other) => return Err(format!("expected {kind:?} artifact, found {other:?}")),
        None => return Err(format!("unknown artifact kind {found}")),
    }

    let length = cursor
        .read_u64::<LittleEndian>()
        .map_err(|e| e.to_string())?;
    let checksum = cursor
        .read_u32::<LittleEndian>()
        .map_err(|e| e.to_string())?;

    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != length {
        return Err(format!(
            "payload is {} bytes, header declares {length}",
            payload.len()
        ));
    }
    if crc32fast::hash(payload) != checksum {
        return Err("checksum mismatch".to_string());
    }

    let (value, read) = bincode::serde::decode_from_slice(payload, bincode::config::standard())
        .map_err(|e| format!("decode failed: {e}"))?;
    if read != payload.len() {
        return Err(format!(
            "{} trailing bytes after payload",
            payload.len() - read
        ));
    }
    Ok(value)
}
