//! NBT (Named Binary Tag) encode/decode, for both network framing (unnamed
//! root compound, as carried inline in play packets) and file framing (named
//! root compound, as used by the chunk/structure file formats) — spec §4.3.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CodecError, Result};

/// NBT tag type IDs.
mod tag_type {
    pub const END: u8 = 0;
    pub const BYTE: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const INT: u8 = 3;
    pub const LONG: u8 = 4;
    pub const FLOAT: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const BYTE_ARRAY: u8 = 7;
    pub const STRING: u8 = 8;
    pub const LIST: u8 = 9;
    pub const COMPOUND: u8 = 10;
    pub const INT_ARRAY: u8 = 11;
    pub const LONG_ARRAY: u8 = 12;
}

/// An NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(NbtList),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// An NBT list. All elements share one type; an empty list carries
/// `Empty` regardless of what type it was declared with on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NbtList {
    #[default]
    Empty,
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    ByteArray(Vec<Vec<i8>>),
    String(Vec<String>),
    List(Vec<NbtList>),
    Compound(Vec<NbtCompound>),
    IntArray(Vec<Vec<i32>>),
    LongArray(Vec<Vec<i64>>),
}

/// An NBT compound: an ordered map of name to value. Lookups by
/// [`NbtCompound::get`] are case-insensitive, matching the loose binding
/// rules the `NbtDecode` derive uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NbtCompound {
    entries: Vec<(String, NbtValue)>,
}

impl NbtCompound {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<NbtValue>) {
        self.entries.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn from_entries(entries: Vec<(String, NbtValue)>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, NbtValue)] {
        &self.entries
    }

    /// Case-insensitive field lookup, for reflective `NbtDecode` binding.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NbtValue> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }

    /// Serialize as a nameless root compound (network NBT): type byte plus
    /// content, no name.
    #[must_use]
    pub fn to_network_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(tag_type::COMPOUND);
        self.write_content(&mut buf);
        buf
    }

    /// Write this compound as a network-framed (nameless) root tag.
    pub fn encode_network<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(tag_type::COMPOUND)?;
        let mut buf = Vec::new();
        self.write_content(&mut buf);
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Read a network-framed (nameless) root compound.
    pub fn decode_network<R: Read>(reader: &mut R) -> Result<Self> {
        let tag_id = reader.read_u8()?;
        if tag_id != tag_type::COMPOUND {
            return Err(CodecError::BadTag(tag_id));
        }
        Self::read_content(reader)
    }

    /// Write this compound as a file-framed root tag: type byte, the root's
    /// name, then content.
    pub fn encode_file<W: Write>(&self, writer: &mut W, root_name: &str) -> Result<()> {
        writer.write_u8(tag_type::COMPOUND)?;
        write_modified_utf8_string(writer, root_name)?;
        let mut buf = Vec::new();
        self.write_content(&mut buf);
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Read a file-framed root compound, returning its name alongside it.
    pub fn decode_file<R: Read>(reader: &mut R) -> Result<(String, Self)> {
        let tag_id = reader.read_u8()?;
        if tag_id != tag_type::COMPOUND {
            return Err(CodecError::BadTag(tag_id));
        }
        let name = read_modified_utf8_string(reader)?;
        let compound = Self::read_content(reader)?;
        Ok((name, compound))
    }

    fn write_content(&self, buf: &mut Vec<u8>) {
        for (name, value) in &self.entries {
            value.write_named(buf, name);
        }
        buf.push(tag_type::END);
    }

    fn read_content<R: Read>(reader: &mut R) -> Result<Self> {
        let mut entries = Vec::new();
        loop {
            let tag_id = reader.read_u8()?;
            if tag_id == tag_type::END {
                break;
            }
            let name = read_modified_utf8_string(reader)?;
            let value = NbtValue::read_content(tag_id, reader)?;
            entries.push((name, value));
        }
        Ok(Self { entries })
    }
}

impl NbtValue {
    fn type_id(&self) -> u8 {
        match self {
            Self::Byte(_) => tag_type::BYTE,
            Self::Short(_) => tag_type::SHORT,
            Self::Int(_) => tag_type::INT,
            Self::Long(_) => tag_type::LONG,
            Self::Float(_) => tag_type::FLOAT,
            Self::Double(_) => tag_type::DOUBLE,
            Self::ByteArray(_) => tag_type::BYTE_ARRAY,
            Self::String(_) => tag_type::STRING,
            Self::List(_) => tag_type::LIST,
            Self::Compound(_) => tag_type::COMPOUND,
            Self::IntArray(_) => tag_type::INT_ARRAY,
            Self::LongArray(_) => tag_type::LONG_ARRAY,
        }
    }

    fn write_named(&self, buf: &mut Vec<u8>, name: &str) {
        buf.push(self.type_id());
        write_modified_utf8_string(buf, name).expect("writing to a Vec never fails");
        self.write_content(buf);
    }

    fn write_content(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Byte(v) => buf.push(*v as u8),
            Self::Short(v) => buf.write_i16::<BigEndian>(*v).unwrap(),
            Self::Int(v) => buf.write_i32::<BigEndian>(*v).unwrap(),
            Self::Long(v) => buf.write_i64::<BigEndian>(*v).unwrap(),
            Self::Float(v) => buf.write_f32::<BigEndian>(*v).unwrap(),
            Self::Double(v) => buf.write_f64::<BigEndian>(*v).unwrap(),
            Self::ByteArray(v) => {
                buf.write_i32::<BigEndian>(v.len() as i32).unwrap();
                for b in v {
                    buf.push(*b as u8);
                }
            }
            Self::String(v) => write_modified_utf8_string(buf, v).unwrap(),
            Self::List(list) => list.write_content(buf),
            Self::Compound(compound) => compound.write_content(buf),
            Self::IntArray(v) => {
                buf.write_i32::<BigEndian>(v.len() as i32).unwrap();
                for i in v {
                    buf.write_i32::<BigEndian>(*i).unwrap();
                }
            }
            Self::LongArray(v) => {
                buf.write_i32::<BigEndian>(v.len() as i32).unwrap();
                for l in v {
                    buf.write_i64::<BigEndian>(*l).unwrap();
                }
            }
        }
    }

    /// Read the content (no leading type byte, already consumed by the
    /// caller) for a tag known to have id `tag_id`.
    fn read_content<R: Read>(tag_id: u8, reader: &mut R) -> Result<Self> {
        Ok(match tag_id {
            tag_type::BYTE => Self::Byte(reader.read_i8()?),
            tag_type::SHORT => Self::Short(reader.read_i16::<BigEndian>()?),
            tag_type::INT => Self::Int(reader.read_i32::<BigEndian>()?),
            tag_type::LONG => Self::Long(reader.read_i64::<BigEndian>()?),
            tag_type::FLOAT => Self::Float(reader.read_f32::<BigEndian>()?),
            tag_type::DOUBLE => Self::Double(reader.read_f64::<BigEndian>()?),
            tag_type::BYTE_ARRAY => {
                let len = non_negative_len(reader.read_i32::<BigEndian>()?)?;
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    v.push(reader.read_i8()?);
                }
                Self::ByteArray(v)
            }
            tag_type::STRING => Self::String(read_modified_utf8_string(reader)?),
            tag_type::LIST => Self::List(NbtList::read_content(reader)?),
            tag_type::COMPOUND => Self::Compound(NbtCompound::read_content(reader)?),
            tag_type::INT_ARRAY => {
                let len = non_negative_len(reader.read_i32::<BigEndian>()?)?;
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    v.push(reader.read_i32::<BigEndian>()?);
                }
                Self::IntArray(v)
            }
            tag_type::LONG_ARRAY => {
                let len = non_negative_len(reader.read_i32::<BigEndian>()?)?;
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    v.push(reader.read_i64::<BigEndian>()?);
                }
                Self::LongArray(v)
            }
            other => return Err(CodecError::BadTag(other)),
        })
    }
}

impl NbtList {
    fn element_type_id(&self) -> u8 {
        match self {
            Self::Empty => tag_type::END,
            Self::Byte(_) => tag_type::BYTE,
            Self::Short(_) => tag_type::SHORT,
            Self::Int(_) => tag_type::INT,
            Self::Long(_) => tag_type::LONG,
            Self::Float(_) => tag_type::FLOAT,
            Self::Double(_) => tag_type::DOUBLE,
            Self::ByteArray(_) => tag_type::BYTE_ARRAY,
            Self::String(_) => tag_type::STRING,
            Self::List(_) => tag_type::LIST,
            Self::Compound(_) => tag_type::COMPOUND,
            Self::IntArray(_) => tag_type::INT_ARRAY,
            Self::LongArray(_) => tag_type::LONG_ARRAY,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Byte(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::ByteArray(v) => v.len(),
            Self::String(v) => v.len(),
            Self::List(v) => v.len(),
            Self::Compound(v) => v.len(),
            Self::IntArray(v) => v.len(),
            Self::LongArray(v) => v.len(),
        }
    }

    fn write_content(&self, buf: &mut Vec<u8>) {
        buf.push(self.element_type_id());
        buf.write_i32::<BigEndian>(self.len() as i32).unwrap();

        match self {
            Self::Empty => {}
            Self::Byte(v) => {
                for b in v {
                    buf.push(*b as u8);
                }
            }
            Self::Short(v) => {
                for s in v {
                    buf.write_i16::<BigEndian>(*s).unwrap();
                }
            }
            Self::Int(v) => {
                for i in v {
                    buf.write_i32::<BigEndian>(*i).unwrap();
                }
            }
            Self::Long(v) => {
                for l in v {
                    buf.write_i64::<BigEndian>(*l).unwrap();
                }
            }
            Self::Float(v) => {
                for f in v {
                    buf.write_f32::<BigEndian>(*f).unwrap();
                }
            }
            Self::Double(v) => {
                for d in v {
                    buf.write_f64::<BigEndian>(*d).unwrap();
                }
            }
            Self::ByteArray(v) => {
                for arr in v {
                    buf.write_i32::<BigEndian>(arr.len() as i32).unwrap();
                    for b in arr {
                        buf.push(*b as u8);
                    }
                }
            }
            Self::String(v) => {
                for s in v {
                    write_modified_utf8_string(buf, s).unwrap();
                }
            }
            Self::List(v) => {
                for list in v {
                    list.write_content(buf);
                }
            }
            Self::Compound(v) => {
                for compound in v {
                    compound.write_content(buf);
                }
            }
            Self::IntArray(v) => {
                for arr in v {
                    buf.write_i32::<BigEndian>(arr.len() as i32).unwrap();
                    for i in arr {
                        buf.write_i32::<BigEndian>(*i).unwrap();
                    }
                }
            }
            Self::LongArray(v) => {
                for arr in v {
                    buf.write_i32::<BigEndian>(arr.len() as i32).unwrap();
                    for l in arr {
                        buf.write_i64::<BigEndian>(*l).unwrap();
                    }
                }
            }
        }
    }

    fn read_content<R: Read>(reader: &mut R) -> Result<Self> {
        let element_type = reader.read_u8()?;
        let len = non_negative_len(reader.read_i32::<BigEndian>()?)?;

        if element_type == tag_type::END || len == 0 {
            // Drain any (illegal but tolerated) elements under a declared
            // END element type; real servers always pair END with len 0.
            return Ok(Self::Empty);
        }

        macro_rules! read_vec {
            ($read:expr) => {{
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    v.push($read(reader)?);
                }
                v
            }};
        }

        Ok(match element_type {
            tag_type::BYTE => Self::Byte(read_vec!(|r: &mut R| r.read_i8())),
            tag_type::SHORT => Self::Short(read_vec!(|r: &mut R| r.read_i16::<BigEndian>())),
            tag_type::INT => Self::Int(read_vec!(|r: &mut R| r.read_i32::<BigEndian>())),
            tag_type::LONG => Self::Long(read_vec!(|r: &mut R| r.read_i64::<BigEndian>())),
            tag_type::FLOAT => Self::Float(read_vec!(|r: &mut R| r.read_f32::<BigEndian>())),
            tag_type::DOUBLE => Self::Double(read_vec!(|r: &mut R| r.read_f64::<BigEndian>())),
            tag_type::BYTE_ARRAY => {
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    let inner_len = non_negative_len(reader.read_i32::<BigEndian>()?)?;
                    let mut inner = Vec::with_capacity(inner_len);
                    for _ in 0..inner_len {
                        inner.push(reader.read_i8()?);
                    }
                    v.push(inner);
                }
                Self::ByteArray(v)
            }
            tag_type::STRING => Self::String(read_vec!(read_modified_utf8_string)),
            tag_type::LIST => Self::List(read_vec!(Self::read_content)),
            tag_type::COMPOUND => Self::Compound(read_vec!(NbtCompound::read_content)),
            tag_type::INT_ARRAY => {
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    let inner_len = non_negative_len(reader.read_i32::<BigEndian>()?)?;
                    let mut inner = Vec::with_capacity(inner_len);
                    for _ in 0..inner_len {
                        inner.push(reader.read_i32::<BigEndian>()?);
                    }
                    v.push(inner);
                }
                Self::IntArray(v)
            }
            tag_type::LONG_ARRAY => {
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    let inner_len = non_negative_len(reader.read_i32::<BigEndian>()?)?;
                    let mut inner = Vec::with_capacity(inner_len);
                    for _ in 0..inner_len {
                        inner.push(reader.read_i64::<BigEndian>()?);
                    }
                    v.push(inner);
                }
                Self::LongArray(v)
            }
            other => return Err(CodecError::BadTag(other)),
        })
    }
}

fn non_negative_len(len: i32) -> Result<usize> {
    if len < 0 {
        Err(CodecError::NegativeLength)
    } else {
        Ok(len as usize)
    }
}

/// Write an NBT string: u16 length prefix, modified-UTF-8 content (U+0000
/// encoded as the two-byte overlong sequence `C0 80`, everything else as
/// ordinary UTF-8 — the two encodings otherwise agree for any text that
/// doesn't contain an embedded NUL).
fn write_modified_utf8_string<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    let mut encoded = Vec::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '\u{0}' {
            encoded.extend_from_slice(&[0xC0, 0x80]);
        } else {
            let mut buf = [0u8; 4];
            encoded.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }
    writer.write_u16::<BigEndian>(encoded.len() as u16)?;
    writer.write_all(&encoded)?;
    Ok(())
}

/// Read an NBT string, decoding the `C0 80` overlong NUL back to `\u{0}`.
fn read_modified_utf8_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = reader.read_u16::<BigEndian>()? as usize;
    let mut raw = vec![0u8; len];
    reader.read_exact(&mut raw)?;

    let mut decoded = Vec::with_capacity(len);
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == 0xC0 && i + 1 < raw.len() && raw[i + 1] == 0x80 {
            decoded.push(0u8);
            i += 2;
        } else {
            decoded.push(raw[i]);
            i += 1;
        }
    }
    Ok(String::from_utf8(decoded)?)
}

/// Reflectively populate a struct's NBT representation. Derived for structs
/// via `#[derive(NbtEncode)]`.
pub trait NbtEncode {
    fn nbt_encode(&self, compound: &mut NbtCompound);
}

macro_rules! try_from_nbt_value {
    ($ty:ty, $variant:ident) => {
        impl TryFrom<&NbtValue> for $ty {
            type Error = ();

            fn try_from(value: &NbtValue) -> std::result::Result<Self, ()> {
                match value {
                    NbtValue::$variant(v) => Ok(v.clone().into()),
                    _ => Err(()),
                }
            }
        }
    };
}

try_from_nbt_value!(i8, Byte);
try_from_nbt_value!(i16, Short);
try_from_nbt_value!(i32, Int);
try_from_nbt_value!(i64, Long);
try_from_nbt_value!(f32, Float);
try_from_nbt_value!(f64, Double);
try_from_nbt_value!(String, String);
try_from_nbt_value!(Vec<i8>, ByteArray);
try_from_nbt_value!(Vec<i32>, IntArray);
try_from_nbt_value!(Vec<i64>, LongArray);
try_from_nbt_value!(NbtCompound, Compound);
try_from_nbt_value!(NbtList, List);

impl TryFrom<&NbtValue> for bool {
    type Error = ();

    fn try_from(value: &NbtValue) -> std::result::Result<Self, ()> {
        match value {
            NbtValue::Byte(v) => Ok(*v != 0),
            _ => Err(()),
        }
    }
}

/// Reflectively build a struct from an NBT compound. Field matching is
/// case-insensitive; unknown compound keys are silently ignored; a field
/// absent from the compound keeps its `Default::default()` value rather
/// than failing. Derived via `#[derive(NbtDecode)]`.
pub trait NbtDecode: Sized {
    fn nbt_decode(compound: &NbtCompound) -> Result<Self>;
}

// Convenient `From` impls for building compounds by hand or via the `nbt!`
// macro below.
impl From<bool> for NbtValue {
    fn from(v: bool) -> Self {
        Self::Byte(i8::from(v))
    }
}

impl From<i8> for NbtValue {
    fn from(v: i8) -> Self {
        Self::Byte(v)
    }
}

impl From<i16> for NbtValue {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i32> for NbtValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for NbtValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for NbtValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for NbtValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for NbtValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for NbtValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<NbtCompound> for NbtValue {
    fn from(v: NbtCompound) -> Self {
        Self::Compound(v)
    }
}

impl From<NbtList> for NbtValue {
    fn from(v: NbtList) -> Self {
        Self::List(v)
    }
}

/// Build an NBT compound ergonomically.
///
/// ```
/// use mc_protocol::nbt;
///
/// let compound = nbt! {
///     "byte" => 1i8,
///     "int" => 42i32,
///     "string" => "hello",
///     "nested" => nbt! {
///         "inner" => true,
///     },
/// };
/// ```
#[macro_export]
macro_rules! nbt {
    () => {
        $crate::nbt::NbtCompound::new()
    };

    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut compound = $crate::nbt::NbtCompound::new();
        $(
            compound.insert($key, $value);
        )*
        compound
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_compound_round_trips_through_network_framing() {
        let compound = nbt! {
            "byte" => 1i8,
            "int" => 42i32,
            "string" => "hello",
        };

        let mut bytes = Vec::new();
        compound.encode_network(&mut bytes).unwrap();

        let decoded = NbtCompound::decode_network(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, compound);
    }

    #[test]
    fn nested_compound_round_trips() {
        let compound = nbt! {
            "outer" => nbt! {
                "inner" => 123i32,
            },
        };

        let mut bytes = Vec::new();
        compound.encode_network(&mut bytes).unwrap();
        let decoded = NbtCompound::decode_network(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, compound);
    }

    #[test]
    fn bool_round_trips_as_byte() {
        let compound = nbt! { "flag" => true };
        let mut bytes = Vec::new();
        compound.encode_network(&mut bytes).unwrap();
        let decoded = NbtCompound::decode_network(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded.get("flag"), Some(&NbtValue::Byte(1)));
    }

    #[test]
    fn file_framing_round_trips_with_root_name() {
        let compound = nbt! { "value" => 7i32 };
        let mut bytes = Vec::new();
        compound.encode_file(&mut bytes, "root").unwrap();

        let (name, decoded) = NbtCompound::decode_file(&mut bytes.as_slice()).unwrap();
        assert_eq!(name, "root");
        assert_eq!(decoded, compound);
    }

    #[test]
    fn list_of_ints_round_trips() {
        let compound = nbt! {
            "numbers" => NbtList::Int(vec![1, 2, 3]),
        };
        let mut bytes = Vec::new();
        compound.encode_network(&mut bytes).unwrap();
        let decoded = NbtCompound::decode_network(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, compound);
    }

    #[test]
    fn empty_list_round_trips() {
        let compound = nbt! { "numbers" => NbtList::Empty };
        let mut bytes = Vec::new();
        compound.encode_network(&mut bytes).unwrap();
        let decoded = NbtCompound::decode_network(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded.get("numbers"), Some(&NbtValue::List(NbtList::Empty)));
    }

    #[test]
    fn embedded_nul_round_trips_as_overlong_sequence() {
        let compound = nbt! { "key" => "a\u{0}b" };
        let mut bytes = Vec::new();
        compound.encode_network(&mut bytes).unwrap();
        // C0 80 should appear in place of a bare 0x00 byte.
        assert!(bytes.windows(2).any(|w| w == [0xC0, 0x80]));

        let decoded = NbtCompound::decode_network(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, compound);
    }

    #[test]
    fn compound_get_is_case_insensitive() {
        let compound = nbt! { "Value" => 5i32 };
        assert_eq!(compound.get("value"), Some(&NbtValue::Int(5)));
        assert_eq!(compound.get("VALUE"), Some(&NbtValue::Int(5)));
    }

    #[test]
    fn unknown_tag_id_is_rejected() {
        let bytes = [99u8, 0, 0]; // bogus tag id, zero-length name
        let err = NbtCompound::decode_network(&mut &bytes[..]).unwrap_err();
        assert!(matches!(err, CodecError::BadTag(99)));
    }
}
