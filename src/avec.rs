//! Convenience interfaces for parsing records of a known shape.
//!
//! Describe a record as a Rust struct implementing [`Record`] (usually
//! derived, see the [`Record`](macro@Record) macro), then build a
//! [`Parser`] for it once and call [`Parser::parse`] on as many buffers as
//! needed. For shapes only known at runtime, build a [`DynamicParser`] from a
//! [`Shape`] instead, which yields [`Structure`] values.

use alloc::vec::Vec;

use crate::sans::{
    kind::{Primitive, PrimitiveKind},
    rebuild::{RebuildError, Values},
    shape::{FieldKind, Shape},
};

#[cfg(doc)]
use crate::sans::rebuild::Structure;

pub mod parser;
pub mod slice;

pub use parser::{DynamicParser, DynamicSpec, Error, ParseRecord, Parser, ParserSpec};
pub use slice::{Records, parse_all};

/// Derive [`Record`] for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// Fields are laid out in declaration order, each taking the layout of its
/// type (see [`FromValues`]). Nested structs must themselves implement
/// [`Record`].
///
/// # Example
///
/// ```
/// #[derive(Debug, Record)]
/// struct Header {
///     id: u8,
///     flags: u8,
/// }
///
/// #[derive(Debug, Record)]
/// struct Frame {
///     header: Header,
///     samples: [i16; 3],
///     #[record(rename = "tag")]
///     label: FixedBytes<4>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use packform_derive::Record;

/// Construct a value from decoded primitives in slot order.
///
/// Implemented for every Rust primitive matching a [`PrimitiveKind`], for
/// `bool`, for [`FixedBytes`], for arrays of any implementor, and for every
/// [`Record`].
pub trait FromValues: Sized {
    /// The kind of a field holding this type, and how often it repeats.
    fn layout() -> (FieldKind, usize);

    /// Consume exactly as many values as [`layout`](Self::layout) describes.
    fn from_values(values: &mut Values) -> Result<Self, RebuildError>;

    /// Append this value's primitives in slot order.
    fn to_values(&self, out: &mut Vec<Primitive>);
}

/// A type with a complete record shape.
///
/// See the [`Record`](macro@Record) derive macro for an automatic
/// implementation of this trait.
pub trait Record: FromValues {
    /// The fields of this record, in wire order.
    fn shape() -> Shape;
}

macro_rules! from_values {
    ($t:ty, $kind:ident) => {
        impl FromValues for $t {
            fn layout() -> (FieldKind, usize) {
                (FieldKind::Primitive(PrimitiveKind::$kind), 1)
            }

            fn from_values(values: &mut Values) -> Result<Self, RebuildError> {
                match values.take()? {
                    Primitive::$kind(x) => Ok(x),
                    other => Err(RebuildError::Mismatch {
                        expected: PrimitiveKind::$kind,
                        found: other.kind(),
                    }),
                }
            }

            fn to_values(&self, out: &mut Vec<Primitive>) {
                out.push(Primitive::$kind(*self));
            }
        }
    };
}

from_values!(i8, I8);
from_values!(u8, U8);
from_values!(i16, I16);
from_values!(u16, U16);
from_values!(i32, I32);
from_values!(u32, U32);
from_values!(i64, I64);
from_values!(u64, U64);
from_values!(f32, F32);
from_values!(f64, F64);
from_values!(bool, Bool);

/// A block of `N` raw bytes, occupying a single slot.
///
/// Unlike `[u8; N]`, which lays out as `N` separate `u8` slots, this is one
/// byte-block slot of width `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> FixedBytes<N> {
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> FromValues for FixedBytes<N> {
    fn layout() -> (FieldKind, usize) {
        (FieldKind::Primitive(PrimitiveKind::Bytes(N)), 1)
    }

    fn from_values(values: &mut Values) -> Result<Self, RebuildError> {
        let value = values.take()?;
        let found = value.kind();

        let bytes = match value {
            Primitive::Bytes(b) => b.try_into().ok(),
            _ => None,
        };

        bytes.map(Self).ok_or(RebuildError::Mismatch {
            expected: PrimitiveKind::Bytes(N),
            found,
        })
    }

    fn to_values(&self, out: &mut Vec<Primitive>) {
        out.push(Primitive::Bytes(self.0.to_vec()));
    }
}

/// Arrays repeat their element's layout, so nested arrays flatten into a
/// single repeated field.
impl<T: FromValues, const N: usize> FromValues for [T; N] {
    fn layout() -> (FieldKind, usize) {
        let (kind, repeat) = T::layout();
        (kind, repeat.saturating_mul(N))
    }

    fn from_values(values: &mut Values) -> Result<Self, RebuildError> {
        let items = (0..N)
            .map(|_| T::from_values(values))
            .collect::<Result<Vec<_>, _>>()?;

        items.try_into().map_err(|_| RebuildError::Exhausted {
            consumed: values.consumed(),
        })
    }

    fn to_values(&self, out: &mut Vec<Primitive>) {
        self.iter().for_each(|x| x.to_values(out));
    }
}
