//! `VarInt`/`VarLong`: Minecraft's 7-bits-per-byte variable-length integer encoding.

use std::io::{Read, Write};

use byteorder::WriteBytesExt;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::{Decode, Encode};

const VARINT_MAX_BYTES: u32 = 5;
const VARLONG_MAX_BYTES: u32 = 10;

fn map_eof(e: std::io::Error) -> CodecError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        CodecError::Truncated
    } else {
        CodecError::Io(e)
    }
}

/// Decode a 32-bit `VarInt` from `reader`, returning `Overlong` if it has not
/// terminated within 5 bytes.
pub fn read_varint<R: Read>(reader: &mut R) -> Result<i32> {
    let mut result: i32 = 0;
    let mut bytes_read: u32 = 0;

    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).map_err(map_eof)?;
        let byte = byte[0];

        result |= ((byte & 0x7F) as i32) << (7 * bytes_read);
        bytes_read += 1;

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        if bytes_read >= VARINT_MAX_BYTES {
            return Err(CodecError::OverlongVarInt);
        }
    }
}

/// Encode a 32-bit `VarInt` to `writer`, emitting at most 5 bytes.
pub fn write_varint<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    let mut value = value as u32;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        writer.write_u8(byte)?;
        if value == 0 {
            return Ok(());
        }
    }
}

/// Number of bytes `write_varint` would emit for `value`.
#[must_use]
pub fn varint_len(value: i32) -> usize {
    let mut value = value as u32;
    let mut len = 1;
    loop {
        value >>= 7;
        if value == 0 {
            return len;
        }
        len += 1;
    }
}

/// Decode a 64-bit `VarLong` from `reader`, returning `Overlong` if it has not
/// terminated within 10 bytes.
pub fn read_varlong<R: Read>(reader: &mut R) -> Result<i64> {
    let mut result: i64 = 0;
    let mut bytes_read: u32 = 0;

    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).map_err(map_eof)?;
        let byte = byte[0];

        result |= ((byte & 0x7F) as i64) << (7 * bytes_read);
        bytes_read += 1;

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        if bytes_read >= VARLONG_MAX_BYTES {
            return Err(CodecError::OverlongVarLong);
        }
    }
}

/// Encode a 64-bit `VarLong` to `writer`, emitting at most 10 bytes.
pub fn write_varlong<W: Write>(writer: &mut W, value: i64) -> Result<()> {
    let mut value = value as u64;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        writer.write_u8(byte)?;
        if value == 0 {
            return Ok(());
        }
    }
}

/// A 32-bit signed integer encoded 7 bits at a time, continuation bit in the
/// MSB of each byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VarInt(pub i32);

impl Encode for VarInt {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_varint(writer, self.0)
    }
}

impl Decode for VarInt {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(VarInt(read_varint(reader)?))
    }
}

impl VarInt {
    #[must_use]
    pub fn encoded_len(self) -> usize {
        varint_len(self.0)
    }
}

impl From<i32> for VarInt {
    fn from(v: i32) -> Self {
        VarInt(v)
    }
}

impl From<VarInt> for i32 {
    fn from(v: VarInt) -> Self {
        v.0
    }
}

/// The 64-bit analogue of [`VarInt`], at most 10 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VarLong(pub i64);

impl Encode for VarLong {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_varlong(writer, self.0)
    }
}

impl Decode for VarLong {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(VarLong(read_varlong(reader)?))
    }
}

impl From<i64> for VarLong {
    fn from(v: i64) -> Self {
        VarLong(v)
    }
}

impl From<VarLong> for i64 {
    fn from(v: VarLong) -> Self {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip_varint(v: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, v).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(read_varint(&mut cursor).unwrap(), v);
        assert_eq!(cursor.position() as usize, buf.len());
        buf
    }

    #[test]
    fn varint_edge_cases() {
        assert_eq!(roundtrip_varint(0), vec![0x00]);
        assert_eq!(roundtrip_varint(1), vec![0x01]);
        assert_eq!(roundtrip_varint(127), vec![0x7f]);
        assert_eq!(roundtrip_varint(128), vec![0x80, 0x01]);
        assert_eq!(roundtrip_varint(255), vec![0xff, 0x01]);
        assert_eq!(roundtrip_varint(25565), vec![0xdd, 0xc7, 0x01]);
        assert_eq!(
            roundtrip_varint(2_147_483_647),
            vec![0xff, 0xff, 0xff, 0xff, 0x07]
        );
        assert_eq!(roundtrip_varint(-1), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(
            roundtrip_varint(-2_147_483_648),
            vec![0x80, 0x80, 0x80, 0x80, 0x08]
        );
    }

    #[test]
    fn varint_len_matches_encoding() {
        for v in [0, 1, 127, 128, 255, 25565, i32::MAX, -1, i32::MIN] {
            let mut buf = Vec::new();
            write_varint(&mut buf, v).unwrap();
            assert_eq!(varint_len(v), buf.len());
        }
    }

    #[test]
    fn varint_overlong_is_rejected() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(
            read_varint(&mut cursor),
            Err(CodecError::OverlongVarInt)
        ));
    }

    #[test]
    fn varint_truncated_is_rejected() {
        let bytes = [0x80];
        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(read_varint(&mut cursor), Err(CodecError::Truncated)));
    }

    #[test]
    fn varlong_roundtrip() {
        for v in [0i64, 1, -1, i64::MAX, i64::MIN, 123_456_789_012] {
            let mut buf = Vec::new();
            write_varlong(&mut buf, v).unwrap();
            assert!(buf.len() <= 10);
            let mut cursor = Cursor::new(&buf);
            assert_eq!(read_varlong(&mut cursor).unwrap(), v);
        }
    }

    #[test]
    fn varlong_overlong_is_rejected() {
        let bytes = [0xff; 11];
        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(
            read_varlong(&mut cursor),
            Err(CodecError::OverlongVarLong)
        ));
    }
}
