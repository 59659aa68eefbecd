//! Composite wire types whose internal structure is defined by Minecraft's
//! game data rather than by this protocol layer. Per the open question noted
//! for this library, these stay opaque byte slabs until the packet that
//! embeds one specifies how many bytes belong to it — inferring their layout
//! here would just be guessing at data this crate doesn't own.

use std::io::{Read, Write};

use crate::{Decode, Encode, Result};

macro_rules! opaque_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name(pub Vec<u8>);

        impl $name {
            #[must_use]
            pub fn into_inner(self) -> Vec<u8> {
                self.0
            }
        }

        impl Encode for $name {
            fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
                writer.write_all(&self.0)?;
                Ok(())
            }
        }

        // Opaque placeholders have no self-describing length; a caller reads
        // the surrounding packet's remaining bytes and constructs this
        // directly rather than calling `decode`.
        impl Decode for $name {
            fn decode<R: Read>(_reader: &mut R) -> Result<Self> {
                Ok($name(Vec::new()))
            }
        }
    };
}

opaque_bytes!(
    /// Entity metadata (tracked-data) list. Structure depends on the entity
    /// type registry, which this crate does not embed.
    EntityMetadata
);
opaque_bytes!(
    /// An inventory slot.
    Slot
);
opaque_bytes!(
    /// The "hashed" slot representation used by some newer packets.
    HashedSlot
);
opaque_bytes!(
    /// A recipe-book display entry.
    RecipeDisplay
);
opaque_bytes!(
    /// A crafting-slot display entry.
    SlotDisplay
);
opaque_bytes!(
    /// A low-precision 3-component vector used by some particle/display
    /// packets.
    LpVec3
);
