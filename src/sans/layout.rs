//! Compiling shapes into flat layouts.

use alloc::{collections::BTreeSet, string::String, vec::Vec};

use thiserror::Error;

use super::{
    kind::PrimitiveKind,
    order::ByteOrder,
    pattern::{self, Pattern},
    shape::{FieldKind, Shape},
};

/// An error compiling a shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Name that does not identify a primitive kind.
    #[error("Unknown field kind `{0}`.")]
    UnknownKind(String),
    /// Field repeated zero times.
    #[error("Field `{field}` must repeat at least once.")]
    ZeroRepeat { field: String },
    /// Byte block of zero width.
    #[error("Byte block `{field}` must be at least one byte wide.")]
    EmptyBytes { field: String },
    /// Two fields of one shape share a name.
    #[error("Field name `{field}` is declared more than once.")]
    DuplicateField { field: String },
    /// Record grows beyond the largest addressable buffer.
    #[error("Field `{field}` makes the record too large to address.")]
    TooLarge { field: String },
}

/// One primitive position in a compiled layout.
///
/// Slots are packed back to back with no padding, so a slot starts where the
/// previous one ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// The primitive stored at this position.
    pub kind: PrimitiveKind,
    /// Byte order of multi-byte values in this slot.
    pub order: ByteOrder,
}

impl Slot {
    /// Number of bytes this slot occupies.
    pub const fn width(&self) -> usize {
        self.kind.width()
    }
}

/// A shape flattened into primitive slots.
///
/// Produced once by [`compile`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLayout {
    order: ByteOrder,
    slots: Vec<Slot>,
    size: usize,
    pattern: Pattern,
}

impl CompiledLayout {
    /// The byte order every slot was compiled under.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Slots in wire order, one per primitive value of a record.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Total number of bytes one record occupies.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The compact format string describing this layout.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Records larger than this cannot be held in a slice.
const MAX_SIZE: usize = isize::MAX as usize;

/// Slot counts past this would overflow the allocation for the slots.
const MAX_SLOTS: usize = MAX_SIZE / core::mem::size_of::<Slot>();

/// Flatten a shape into slots under a single byte order.
///
/// Fields are visited depth-first in declaration order. Repeated fields emit
/// their slots once per repetition, and nested shapes splice their slots in
/// place.
///
/// The whole shape is validated and measured before any slot is emitted, so
/// an oversized shape is rejected without allocating for it.
pub fn compile(shape: &Shape, order: ByteOrder) -> Result<CompiledLayout, SchemaError> {
    let Extent { slots: count, size } = measure(shape)?;

    let mut slots = Vec::with_capacity(count);
    expand(shape, order, &mut slots);

    let pattern = pattern::format(order, &slots);

    Ok(CompiledLayout {
        order,
        slots,
        size,
        pattern,
    })
}

/// Number of slots and bytes a shape expands to.
#[derive(Debug, Clone, Copy)]
struct Extent {
    slots: usize,
    size: usize,
}

fn measure(shape: &Shape) -> Result<Extent, SchemaError> {
    let mut names = BTreeSet::new();
    let mut total = Extent { slots: 0, size: 0 };

    for field in shape.fields() {
        let name = field.name();

        if !names.insert(name) {
            Err(SchemaError::DuplicateField { field: name.into() })?;
        }

        let repeat = field.repeat_count();
        if repeat == 0 {
            Err(SchemaError::ZeroRepeat { field: name.into() })?;
        }

        let one = match field.kind() {
            FieldKind::Primitive(PrimitiveKind::Bytes(0)) => {
                Err(SchemaError::EmptyBytes { field: name.into() })?
            }
            FieldKind::Primitive(kind) => Extent {
                slots: 1,
                size: kind.width(),
            },
            FieldKind::Nested(nested) => measure(nested)?,
        };

        let grow = |total: usize, one: usize, max: usize| {
            one.checked_mul(repeat)
                .and_then(|n| n.checked_add(total))
                .filter(|&n| n <= max)
                .ok_or_else(|| SchemaError::TooLarge { field: name.into() })
        };

        total = Extent {
            slots: grow(total.slots, one.slots, MAX_SLOTS)?,
            size: grow(total.size, one.size, MAX_SIZE)?,
        };
    }

    Ok(total)
}

/// Emit the slots of a shape already accepted by [`measure`].
fn expand(shape: &Shape, order: ByteOrder, slots: &mut Vec<Slot>) {
    for field in shape.fields() {
        match field.kind() {
            FieldKind::Primitive(kind) => {
                let slot = Slot { kind: *kind, order };
                slots.extend(core::iter::repeat_n(slot, field.repeat_count()));
            }
            FieldKind::Nested(nested) => {
                let start = slots.len();
                expand(nested, order, slots);

                // Splice further copies of the nested slots for each repetition.
                let end = slots.len();
                for _ in 1..field.repeat_count() {
                    slots.extend_from_within(start..end);
                }
            }
        }
    }
}
