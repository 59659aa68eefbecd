//! Generic composite wire shapes that aren't tied to one concrete type:
//! prefixed/unprefixed arrays, context-presence vs. boolean-prefixed
//! optionals, either-of, id-or-inline, and id-set.
//!
//! `PrefixedArray<T>` and `PrefixedOptional<T>` are the blanket `Vec<T>`/
//! `Option<T>` impls in [`crate::primitives`] — every packet field of those
//! shapes just uses `Vec<T>`/`Option<T>` directly. The types below cover the
//! shapes that can't hang off a blanket impl because they need information
//! from outside the value itself (a count field elsewhere in the packet, a
//! presence flag that isn't adjacent) or because they're a tagged union.

use std::io::{Read, Write};

use crate::error::CodecError;
use crate::primitives::Identifier;
use crate::varint::{read_varint, write_varint};
use crate::{Decode, Encode, Result};

/// `n` consecutive `T` values with no length prefix; `n` is supplied by the
/// caller from context (e.g. a sibling field, or a packet-specific constant).
pub fn decode_array<R: Read, T: Decode>(reader: &mut R, n: usize) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(n.min(4096));
    for _ in 0..n {
        out.push(T::decode(reader)?);
    }
    Ok(out)
}

pub fn encode_array<W: Write, T: Encode>(writer: &mut W, items: &[T]) -> Result<()> {
    for item in items {
        item.encode(writer)?;
    }
    Ok(())
}

/// A value present based on adjacent context (not a boolean prefix in this
/// position). The caller decides whether to call `decode`/whether to call
/// `encode` at all; this alias exists purely so packet definitions can name
/// the shape distinctly from [`PrefixedOptional`].
pub type ContextOptional<T> = Option<T>;

/// A value preceded by its own `Boolean` presence flag — the blanket
/// `Option<T>` impl already implements exactly this. Re-exported under this
/// name for packet definitions that want to say so explicitly.
pub type PrefixedOptional<T> = Option<T>;

/// One `Boolean`; `true` selects `X`, `false` selects `Y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<X, Y> {
    Left(X),
    Right(Y),
}

impl<X: Encode, Y: Encode> Encode for Either<X, Y> {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Either::Left(x) => {
                true.encode(writer)?;
                x.encode(writer)
            }
            Either::Right(y) => {
                false.encode(writer)?;
                y.encode(writer)
            }
        }
    }
}

impl<X: Decode, Y: Decode> Decode for Either<X, Y> {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        if bool::decode(reader)? {
            Ok(Either::Left(X::decode(reader)?))
        } else {
            Ok(Either::Right(Y::decode(reader)?))
        }
    }
}

/// A `VarInt` tag: `0` means an inline `T` payload follows; `k > 0` means
/// registry id `k - 1` with no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrInline<T> {
    Inline(T),
    Id(i32),
}

impl<T: Encode> Encode for IdOrInline<T> {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            IdOrInline::Inline(value) => {
                write_varint(writer, 0)?;
                value.encode(writer)
            }
            IdOrInline::Id(id) => write_varint(writer, id + 1),
        }
    }
}

impl<T: Decode> Decode for IdOrInline<T> {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let tag = read_varint(reader)?;
        if tag == 0 {
            Ok(IdOrInline::Inline(T::decode(reader)?))
        } else {
            Ok(IdOrInline::Id(tag - 1))
        }
    }
}

/// A `VarInt` type: `0` means a single [`Identifier`] tag reference follows;
/// `k > 0` means `k - 1` consecutive `VarInt` registry ids follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdSet {
    Tag(Identifier),
    Ids(Vec<i32>),
}

impl Encode for IdSet {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            IdSet::Tag(id) => {
                write_varint(writer, 0)?;
                id.encode(writer)
            }
            IdSet::Ids(ids) => {
                write_varint(writer, ids.len() as i32 + 1)?;
                for id in ids {
                    write_varint(writer, *id)?;
                }
                Ok(())
            }
        }
    }
}

impl Decode for IdSet {
    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let kind = read_varint(reader)?;
        if kind == 0 {
            Ok(IdSet::Tag(Identifier::decode(reader)?))
        } else {
            let count = kind - 1;
            if count < 0 {
                return Err(CodecError::NegativeLength);
            }
            let mut ids = Vec::with_capacity((count as usize).min(4096));
            for _ in 0..count {
                ids.push(read_varint(reader)?);
            }
            Ok(IdSet::Ids(ids))
        }
    }
}

pub use crate::primitives::FixedBitSet;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn either_round_trip() {
        let left: Either<i32, String> = Either::Left(42);
        let mut buf = Vec::new();
        left.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(Either::<i32, String>::decode(&mut cursor).unwrap(), left);

        let right: Either<i32, String> = Either::Right("hi".to_string());
        let mut buf = Vec::new();
        right.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(Either::<i32, String>::decode(&mut cursor).unwrap(), right);
    }

    #[test]
    fn id_or_inline_round_trip() {
        let inline: IdOrInline<i32> = IdOrInline::Inline(7);
        let mut buf = Vec::new();
        inline.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x07]);

        let id: IdOrInline<i32> = IdOrInline::Id(3);
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(IdOrInline::<i32>::decode(&mut cursor).unwrap(), id);
    }

    #[test]
    fn id_set_round_trip() {
        let tag = IdSet::Tag(Identifier::from("logs"));
        let mut buf = Vec::new();
        tag.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(IdSet::decode(&mut cursor).unwrap(), tag);

        let ids = IdSet::Ids(vec![1, 2, 3]);
        let mut buf = Vec::new();
        ids.encode(&mut buf).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(IdSet::decode(&mut cursor).unwrap(), ids);
    }

    #[test]
    fn array_uses_external_count() {
        let items = vec![1i32, 2, 3];
        let mut buf = Vec::new();
        encode_array(&mut buf, &items).unwrap();
        let mut cursor = Cursor::new(&buf);
        let decoded: Vec<i32> = decode_array(&mut cursor, 3).unwrap();
        assert_eq!(decoded, items);
    }
}
