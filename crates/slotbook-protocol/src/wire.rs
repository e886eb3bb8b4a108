//! Primitive field codecs for the fixed-layout wire format.
//!
//! Encoders append to a byte buffer; decoders walk a `(buffer, cursor)`
//! pair and never consume more bytes than the field declares, so anything
//! past the last field is left untouched for the caller (and ignored, for
//! forward compatibility).

use crate::SLOTS_PER_DAY;
use crate::error::{ProtocolError, ProtocolResult};

pub(crate) fn put_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

pub(crate) fn put_i8(buf: &mut Vec<u8>, v: i8) {
    // two's-complement byte, i.e. (v + 256) mod 256
    buf.push(v as u8);
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Appends the UTF-8 bytes of `s` followed by the `0x00` terminator.
/// Embedded NUL bytes are not representable in this format.
pub(crate) fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

pub(crate) fn read_u8(buf: &[u8], pos: &mut usize) -> ProtocolResult<u8> {
    let Some(&byte) = buf.get(*pos) else {
        return Err(ProtocolError::Truncated {
            expected: *pos + 1,
            received: buf.len(),
        });
    };
    *pos += 1;
    Ok(byte)
}

pub(crate) fn read_i8(buf: &[u8], pos: &mut usize) -> ProtocolResult<i8> {
    Ok(read_u8(buf, pos)? as i8)
}

pub(crate) fn read_u32(buf: &[u8], pos: &mut usize) -> ProtocolResult<u32> {
    let end = *pos + 4;
    let Some(bytes) = buf.get(*pos..end) else {
        return Err(ProtocolError::Truncated {
            expected: end,
            received: buf.len(),
        });
    };
    *pos = end;
    Ok(u32::from_le_bytes(bytes.try_into().expect("slice is 4 bytes")))
}

/// Reads a NUL-terminated UTF-8 string starting at the cursor.
///
/// Scans forward for the `0x00` byte; hitting the end of the buffer first
/// is [`ProtocolError::MissingTerminator`]. The cursor lands just past the
/// terminator.
pub(crate) fn read_str(buf: &[u8], pos: &mut usize) -> ProtocolResult<String> {
    let start = *pos;
    let Some(rel) = buf[start.min(buf.len())..].iter().position(|&b| b == 0) else {
        return Err(ProtocolError::MissingTerminator);
    };
    let end = start + rel;
    let text = String::from_utf8(buf[start..end].to_vec())?;
    *pos = end + 1;
    Ok(text)
}

/// Reads one fixed 16-byte slot vector by direct slicing.
pub(crate) fn read_slots(buf: &[u8], pos: &mut usize) -> ProtocolResult<[u8; SLOTS_PER_DAY]> {
    let end = *pos + SLOTS_PER_DAY;
    let Some(bytes) = buf.get(*pos..end) else {
        return Err(ProtocolError::Truncated {
            expected: end,
            received: buf.len(),
        });
    };
    *pos = end;
    Ok(bytes.try_into().expect("slice is SLOTS_PER_DAY bytes"))
}
