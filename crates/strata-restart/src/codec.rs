//! Binary encode/decode for the checkpoint format.
//!
//! All integers are little-endian. Strings and byte arrays are
//! length-prefixed with a `u32` length. The format is intentionally
//! simple — no compression, no alignment padding, no self-describing
//! schema.

use std::io::{Read, Write};

use strata_core::ElementKind;

use crate::error::RestartError;
use crate::writer::Record;
use crate::{FORMAT_VERSION, MAGIC};

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), RestartError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), RestartError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), RestartError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Write a length-prefixed byte array (u32 length + bytes).
pub fn write_length_prefixed_bytes(w: &mut dyn Write, b: &[u8]) -> Result<(), RestartError> {
    write_u32_le(w, b.len() as u32)?;
    w.write_all(b)?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, RestartError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, RestartError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a length-prefixed UTF-8 string.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, RestartError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| RestartError::MalformedRecord {
        detail: format!("invalid UTF-8 path: {e}"),
    })
}

/// Read a length-prefixed byte array.
pub fn read_length_prefixed_bytes(r: &mut dyn Read) -> Result<Vec<u8>, RestartError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the checkpoint header (magic, version, record count).
pub fn encode_header(w: &mut dyn Write, record_count: u32) -> Result<(), RestartError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u32_le(w, record_count)?;
    Ok(())
}

/// Decode and validate the checkpoint header.
///
/// Returns the record count on success.
pub fn decode_header(r: &mut dyn Read) -> Result<u32, RestartError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(RestartError::InvalidMagic);
    }

    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(RestartError::UnsupportedVersion { found: version });
    }

    read_u32_le(r)
}

// ── Record encode/decode ────────────────────────────────────────

/// Encode a single field record.
pub fn encode_record(w: &mut dyn Write, record: &Record) -> Result<(), RestartError> {
    write_length_prefixed_str(w, &record.path)?;
    write_u8(w, record.kind.tag())?;
    write_length_prefixed_bytes(w, &record.payload)?;
    Ok(())
}

/// Decode a single field record.
pub fn decode_record(r: &mut dyn Read) -> Result<Record, RestartError> {
    let path = read_length_prefixed_str(r)?;
    let tag = read_u8(r)?;
    let kind = ElementKind::from_tag(tag).ok_or_else(|| RestartError::MalformedRecord {
        detail: format!("unknown element-kind tag {tag} for '{path}'"),
    })?;
    let payload = read_length_prefixed_bytes(r)?;
    Ok(Record {
        path,
        kind,
        payload,
    })
}
