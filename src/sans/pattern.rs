//! Compact textual form of a compiled layout.
//!
//! A pattern is one byte-order token followed by one token per slot:
//!
//! | kind  | token | kind  | token | kind    | token |
//! |-------|-------|-------|-------|---------|-------|
//! | `i8`  | `b`   | `u8`  | `B`   | `f32`   | `f`   |
//! | `i16` | `h`   | `u16` | `H`   | `f64`   | `d`   |
//! | `i32` | `i`   | `u32` | `I`   | `bool`  | `?`   |
//! | `i64` | `q`   | `u64` | `Q`   | `bytes` | `Ns`  |
//!
//! The byte-order tokens are `=` (native), `<` (little), `>` (big) and `!`
//! (network). No padding is ever implied.

use alloc::vec::Vec;
use core::fmt;

use super::{kind::PrimitiveKind, layout::Slot, order::ByteOrder};

/// A single pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Order(ByteOrder),
    Slot(PrimitiveKind),
}

impl Token {
    /// Bytes covered by this token.
    pub fn width(&self) -> usize {
        match self {
            Self::Order(_) => 0,
            Self::Slot(kind) => kind.width(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Order(order) => order.token(),
            Self::Slot(PrimitiveKind::Bytes(n)) => return write!(f, "{n}s"),
            Self::Slot(PrimitiveKind::I8) => 'b',
            Self::Slot(PrimitiveKind::U8) => 'B',
            Self::Slot(PrimitiveKind::I16) => 'h',
            Self::Slot(PrimitiveKind::U16) => 'H',
            Self::Slot(PrimitiveKind::I32) => 'i',
            Self::Slot(PrimitiveKind::U32) => 'I',
            Self::Slot(PrimitiveKind::I64) => 'q',
            Self::Slot(PrimitiveKind::U64) => 'Q',
            Self::Slot(PrimitiveKind::F32) => 'f',
            Self::Slot(PrimitiveKind::F64) => 'd',
            Self::Slot(PrimitiveKind::Bool) => '?',
        };

        write!(f, "{c}")
    }
}

/// An ordered token sequence, led by its byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(Vec<Token>);

impl Pattern {
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Total bytes covered, with no padding between tokens.
    pub fn size(&self) -> usize {
        self.0.iter().map(Token::width).sum()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|t| write!(f, "{t}"))
    }
}

/// Turn a byte order and slot sequence into a pattern.
pub fn format(order: ByteOrder, slots: &[Slot]) -> Pattern {
    let tokens = core::iter::once(Token::Order(order))
        .chain(slots.iter().map(|s| Token::Slot(s.kind)))
        .collect();

    Pattern(tokens)
}
