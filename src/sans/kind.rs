//! Primitive kinds and the values decoded from them.

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use zerocopy::byteorder::{BigEndian, F32, F64, I16, I32, I64, LittleEndian, U16, U32, U64};

use super::layout::SchemaError;

/// The closed set of primitives a slot may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PrimitiveKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
    /// A block of raw bytes with an explicit width.
    Bytes(usize),
}

impl PrimitiveKind {
    /// Number of bytes a slot of this kind occupies.
    pub const fn width(self) -> usize {
        match self {
            Self::I8 | Self::U8 | Self::Bool => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::Bytes(n) => n,
        }
    }

    /// Whether this kind is a signed integer.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Whether this kind is a floating point number.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Decode one slot of this kind from exactly `width` bytes.
    pub(crate) fn decode(self, r: &[u8], is_le: bool) -> Primitive {
        macro_rules! endian {
            ($t:ident) => {{
                let b = take(r);
                if is_le {
                    $t::<LittleEndian>::from_bytes(b).get()
                } else {
                    $t::<BigEndian>::from_bytes(b).get()
                }
            }};
        }

        match self {
            Self::I8 => Primitive::I8(i8::from_ne_bytes(take(r))),
            Self::U8 => Primitive::U8(u8::from_ne_bytes(take(r))),
            Self::I16 => Primitive::I16(endian!(I16)),
            Self::U16 => Primitive::U16(endian!(U16)),
            Self::I32 => Primitive::I32(endian!(I32)),
            Self::U32 => Primitive::U32(endian!(U32)),
            Self::I64 => Primitive::I64(endian!(I64)),
            Self::U64 => Primitive::U64(endian!(U64)),
            Self::F32 => Primitive::F32(endian!(F32)),
            Self::F64 => Primitive::F64(endian!(F64)),
            Self::Bool => Primitive::Bool(u8::from_ne_bytes(take(r)) != 0),
            Self::Bytes(_) => Primitive::Bytes(r.to_vec()),
        }
    }
}

/// Copy a slice already known to hold `N` bytes into an array.
fn take<const N: usize>(r: &[u8]) -> [u8; N] {
    let mut b = [0; N];
    b.copy_from_slice(&r[..N]);
    b
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8 => f.write_str("int8"),
            Self::U8 => f.write_str("uint8"),
            Self::I16 => f.write_str("int16"),
            Self::U16 => f.write_str("uint16"),
            Self::I32 => f.write_str("int32"),
            Self::U32 => f.write_str("uint32"),
            Self::I64 => f.write_str("int64"),
            Self::U64 => f.write_str("uint64"),
            Self::F32 => f.write_str("float32"),
            Self::F64 => f.write_str("float64"),
            Self::Bool => f.write_str("bool"),
            Self::Bytes(n) => write!(f, "bytes{n}"),
        }
    }
}

impl FromStr for PrimitiveKind {
    type Err = SchemaError;

    /// Parse a kind from its long (`uint16`) or short (`u16`) name. Byte
    /// blocks are written `bytesN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "int8" | "i8" => Self::I8,
            "uint8" | "u8" => Self::U8,
            "int16" | "i16" => Self::I16,
            "uint16" | "u16" => Self::U16,
            "int32" | "i32" => Self::I32,
            "uint32" | "u32" => Self::U32,
            "int64" | "i64" => Self::I64,
            "uint64" | "u64" => Self::U64,
            "float32" | "f32" => Self::F32,
            "float64" | "f64" => Self::F64,
            "bool" => Self::Bool,
            _ => match s.strip_prefix("bytes").map(str::parse::<usize>) {
                Some(Ok(n)) => Self::Bytes(n),
                _ => Err(SchemaError::UnknownKind(String::from(s)))?,
            },
        })
    }
}

/// A single decoded slot.
///
/// Serializes as the bare value, without naming its kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Primitive {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl Primitive {
    /// The kind of slot this value fits.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::I8(_) => PrimitiveKind::I8,
            Self::U8(_) => PrimitiveKind::U8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::U16(_) => PrimitiveKind::U16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::U32(_) => PrimitiveKind::U32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Bytes(b) => PrimitiveKind::Bytes(b.len()),
        }
    }

    /// Append the encoding of this value to `w`.
    pub(crate) fn encode(&self, w: &mut Vec<u8>, is_le: bool) {
        macro_rules! endian {
            ($t:ident, $x:expr) => {
                if is_le {
                    w.extend_from_slice(&$t::<LittleEndian>::new(*$x).to_bytes())
                } else {
                    w.extend_from_slice(&$t::<BigEndian>::new(*$x).to_bytes())
                }
            };
        }

        match self {
            Self::I8(x) => w.extend_from_slice(&x.to_ne_bytes()),
            Self::U8(x) => w.push(*x),
            Self::I16(x) => endian!(I16, x),
            Self::U16(x) => endian!(U16, x),
            Self::I32(x) => endian!(I32, x),
            Self::U32(x) => endian!(U32, x),
            Self::I64(x) => endian!(I64, x),
            Self::U64(x) => endian!(U64, x),
            Self::F32(x) => endian!(F32, x),
            Self::F64(x) => endian!(F64, x),
            Self::Bool(x) => w.push(*x as u8),
            Self::Bytes(b) => w.extend_from_slice(b),
        }
    }
}
