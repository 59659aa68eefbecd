//! Fixed-width numerics, strings, and the small fixed-shape composite types
//! (`Position`, `Angle`, `BitSet`, `Identifier`, UUID).

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::varint::{read_varint, write_varint};
use crate::{Decode, Encode, Result};

impl Encode for bool {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        // Encoders MUST emit 0x01 for true, never some other nonzero value.
        writer.write_u8(u8::from(*self))?;
        Ok(())
    }
}

impl Decode for bool {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_u8()? != 0)
    }
}

macro_rules! impl_fixed_numeric {
    ($ty:ty, $read:ident, $write:ident) => {
        impl Encode for $ty {
            fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
                writer.$write::<BigEndian>(*self)?;
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode<R: Read>(reader: &mut R) -> Result<Self> {
                Ok(reader.$read::<BigEndian>()?)
            }
        }
    };
}

impl Encode for u8 {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(*self)?;
        Ok(())
    }
}

impl Decode for u8 {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_u8()?)
    }
}

impl Encode for i8 {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i8(*self)?;
        Ok(())
    }
}

impl Decode for i8 {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_i8()?)
    }
}

impl_fixed_numeric!(i16, read_i16, write_i16);
impl_fixed_numeric!(u16, read_u16, write_u16);
impl_fixed_numeric!(i32, read_i32, write_i32);
impl_fixed_numeric!(i64, read_i64, write_i64);
impl_fixed_numeric!(u64, read_u64, write_u64);
impl_fixed_numeric!(f32, read_f32, write_f32);
impl_fixed_numeric!(f64, read_f64, write_f64);

/// Length-prefixed (`VarInt` byte count) UTF-8 string.
///
/// Decoding validates the declared byte length against `max` before reading,
/// and validates UTF-8 after — a conservative reading of the spec's "the wire
/// doesn't mandate validation" note.
pub fn encode_string<W: Write>(s: &str, writer: &mut W) -> Result<()> {
    let bytes = s.as_bytes();
    write_varint(writer, bytes.len() as i32)?;
    writer.write_all(bytes)?;
    Ok(())
}

pub fn decode_string<R: Read>(reader: &mut R, max: usize) -> Result<String> {
    let len = read_varint(reader)?;
    if len < 0 {
        return Err(CodecError::NegativeLength);
    }
    let len = len as usize;
    if len > max {
        return Err(CodecError::LengthExceedsMax { len, max });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Default byte-length cap applied by the blanket `Decode for String` impl.
/// Callers needing a tighter bound should call [`decode_string`] directly.
pub const DEFAULT_MAX_STRING_LEN: usize = 32767 * 4;

impl Encode for str {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        encode_string(self, writer)
    }
}

impl Encode for String {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.as_str().encode(writer)
    }
}

impl Decode for String {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        decode_string(reader, DEFAULT_MAX_STRING_LEN)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Some(v) => {
                true.encode(writer)?;
                v.encode(writer)
            }
            None => false.encode(writer),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        if bool::decode(reader)? {
            Ok(Some(T::decode(reader)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_varint(writer, self.len() as i32)?;
        for item in self {
            item.encode(writer)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let len = read_varint(reader)?;
        if len < 0 {
            return Err(CodecError::NegativeLength);
        }
        let mut vec = Vec::with_capacity((len as usize).min(4096));
        for _ in 0..len {
            vec.push(T::decode(reader)?);
        }
        Ok(vec)
    }
}

/// 128-bit UUID, two big-endian 64-bit halves, 16 bytes total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Uuid(pub u128);

impl Encode for Uuid {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>((self.0 >> 64) as u64)?;
        writer.write_u64::<BigEndian>(self.0 as u64)?;
        Ok(())
    }
}

impl Decode for Uuid {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let high = u128::from(reader.read_u64::<BigEndian>()?);
        let low = u128::from(reader.read_u64::<BigEndian>()?);
        Ok(Uuid((high << 64) | low))
    }
}

impl From<u128> for Uuid {
    fn from(v: u128) -> Self {
        Uuid(v)
    }
}

/// A block position packed into a single 64-bit big-endian integer:
/// `x` (26 bits, high), `z` (26 bits, middle), `y` (12 bits, low), all signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Encode for Position {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        let packed = ((i64::from(self.x) & 0x3FF_FFFF) << 38)
            | ((i64::from(self.z) & 0x3FF_FFFF) << 12)
            | (i64::from(self.y) & 0xFFF);
        writer.write_i64::<BigEndian>(packed)?;
        Ok(())
    }
}

impl Decode for Position {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let packed = reader.read_i64::<BigEndian>()?;
        // Shift each field to the top of an i64 and back to sign-extend.
        let x = (packed >> 38) as i32;
        let y = (packed << 52 >> 52) as i32;
        let z = (packed << 26 >> 38) as i32;
        Ok(Position { x, y, z })
    }
}

/// 1/256 of a full turn, stored as a single unsigned byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Angle(pub u8);

impl Encode for Angle {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.0)?;
        Ok(())
    }
}

impl Decode for Angle {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Angle(reader.read_u8()?))
    }
}

/// A `VarInt`-prefixed sequence of 64-bit words, interpreted as a bitset with
/// bit `i` of word `w` mapping to overall bit index `64 * w + i`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BitSet(pub Vec<u64>);

impl Encode for BitSet {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_varint(writer, self.0.len() as i32)?;
        for word in &self.0 {
            writer.write_u64::<BigEndian>(*word)?;
        }
        Ok(())
    }
}

impl Decode for BitSet {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let len = read_varint(reader)?;
        if len < 0 {
            return Err(CodecError::NegativeLength);
        }
        let mut words = Vec::with_capacity((len as usize).min(4096));
        for _ in 0..len {
            words.push(reader.read_u64::<BigEndian>()?);
        }
        Ok(BitSet(words))
    }
}

/// A fixed-length bitset of `n` bits, packed into `ceil(n/8)` bytes, bits
/// little-endian within each byte. `n` comes from surrounding context, so
/// this type carries it explicitly rather than via a `VarInt` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedBitSet {
    bits: usize,
    bytes: Vec<u8>,
}

impl FixedBitSet {
    #[must_use]
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            bytes: vec![0u8; bits.div_ceil(8)],
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.bits, "bit index out of range");
        (self.bytes[index / 8] >> (index % 8)) & 1 != 0
    }

    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.bits, "bit index out of range");
        let byte = &mut self.bytes[index / 8];
        if value {
            *byte |= 1 << (index % 8);
        } else {
            *byte &= !(1 << (index % 8));
        }
    }

    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        Ok(())
    }

    pub fn decode<R: Read>(reader: &mut R, bits: usize) -> Result<Self> {
        let mut bytes = vec![0u8; bits.div_ceil(8)];
        reader.read_exact(&mut bytes)?;
        Ok(Self { bits, bytes })
    }
}

/// A namespaced resource identifier, `"namespace:path"`. Defaults the
/// namespace to `minecraft` when the caller supplies a bare path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";
    pub const MAX_LEN: usize = 32767;

    /// # Panics
    /// Panics if `namespace` or `path` contain a `:`.
    #[must_use]
    pub fn new(namespace: &str, path: &str) -> Self {
        assert!(!namespace.contains(':') && !path.contains(':'));
        Identifier(format!("{namespace}:{path}"))
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or(Self::DEFAULT_NAMESPACE, |(ns, _)| ns)
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, p)| p)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        if s.contains(':') {
            Identifier(s.to_string())
        } else {
            Identifier(format!("{}:{s}", Self::DEFAULT_NAMESPACE))
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Encode for Identifier {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        encode_string(&self.0, writer)
    }
}

impl Decode for Identifier {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let s = decode_string(reader, Self::MAX_LEN)?;
        Ok(Identifier::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn position_round_trip() {
        let pos = Position { x: 100, y: 64, z: 200 };
        let mut buf = Vec::new();
        pos.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), 8);
        let packed = i64::from_be_bytes(buf.clone().try_into().unwrap());
        assert_eq!(packed & 0xFFF, 64);
        assert_eq!((packed >> 12) & 0x3FF_FFFF, 200);
        assert_eq!((packed >> 38) & 0x3FF_FFFF, 100);

        let mut cursor = Cursor::new(&buf);
        assert_eq!(Position::decode(&mut cursor).unwrap(), pos);
    }

    #[test]
    fn position_negative_round_trip() {
        let pos = Position { x: -100, y: -64, z: -200 };
        let mut buf = Vec::new();
        pos.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(Position::decode(&mut cursor).unwrap(), pos);
    }

    #[test]
    fn string_round_trip() {
        let s = "hello, world";
        let mut buf = Vec::new();
        s.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(String::decode(&mut cursor).unwrap(), s);
    }

    #[test]
    fn string_over_max_is_rejected() {
        let mut buf = Vec::new();
        "hello".encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert!(matches!(
            decode_string(&mut cursor, 2),
            Err(CodecError::LengthExceedsMax { .. })
        ));
    }

    #[test]
    fn uuid_round_trip() {
        let uuid = Uuid(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10);
        let mut buf = Vec::new();
        uuid.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), 16);
        let mut cursor = Cursor::new(&buf);
        assert_eq!(Uuid::decode(&mut cursor).unwrap(), uuid);
    }

    #[test]
    fn fixed_bitset_bit_order_is_little_endian_within_byte() {
        let mut bits = FixedBitSet::new(10);
        bits.set(0, true);
        bits.set(9, true);
        let mut buf = Vec::new();
        bits.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0b0000_0001, 0b0000_0010]);
    }

    #[test]
    fn identifier_defaults_namespace() {
        let id = Identifier::from("stone");
        assert_eq!(id.namespace(), "minecraft");
        assert_eq!(id.path(), "stone");
        assert_eq!(id.as_str(), "minecraft:stone");

        let id2 = Identifier::from("modded:thing");
        assert_eq!(id2.namespace(), "modded");
        assert_eq!(id2.path(), "thing");
    }
}
