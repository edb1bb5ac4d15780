//! Decoding records into primitive values, and the inverse.

use alloc::vec::Vec;

use either::Either::{self, Left, Right};
use thiserror::Error;

use super::{
    kind::{Primitive, PrimitiveKind},
    layout::CompiledLayout,
};

/// Decode one record from the front of a buffer.
///
/// Returns the primitive values, one per slot, and the bytes after the
/// record. If the buffer is too short to hold a record, returns it unchanged
/// on the right so the caller can retry once more bytes arrive.
pub fn decode<'a>(
    layout: &CompiledLayout,
    r: &'a [u8],
) -> Either<(Vec<Primitive>, &'a [u8]), &'a [u8]> {
    let Some((record, leftover)) = r.split_at_checked(layout.size()) else {
        return Right(r);
    };

    let is_le = layout.order().is_little_endian();
    let i = &mut 0; // Offset of the next slot within the record.

    let values = layout
        .slots()
        .iter()
        .map(|slot| {
            let s = *i;
            *i += slot.width();
            slot.kind.decode(&record[s..*i], is_le)
        })
        .collect();

    Left((values, leftover))
}

/// An error encoding values against a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Number of values differs from the number of slots.
    #[error("Expected {expected} values, found {found}.")]
    Count { expected: usize, found: usize },
    /// Value does not fit its slot.
    #[error("Slot {index} holds {expected}, found {found}.")]
    Mismatch {
        index: usize,
        expected: PrimitiveKind,
        found: PrimitiveKind,
    },
}

/// Encode one value per slot into a record of exactly the layout's size.
pub fn encode(layout: &CompiledLayout, values: &[Primitive]) -> Result<Vec<u8>, EncodeError> {
    let slots = layout.slots();

    if slots.len() != values.len() {
        Err(EncodeError::Count {
            expected: slots.len(),
            found: values.len(),
        })?;
    }

    let is_le = layout.order().is_little_endian();
    let mut w = Vec::with_capacity(layout.size());

    for (index, (slot, value)) in slots.iter().zip(values).enumerate() {
        if slot.kind != value.kind() {
            Err(EncodeError::Mismatch {
                index,
                expected: slot.kind,
                found: value.kind(),
            })?;
        }

        value.encode(&mut w, is_le);
    }

    Ok(w)
}
