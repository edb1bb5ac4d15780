//! Two-phase parsers: describe once, build once, parse many times.

use alloc::vec::Vec;
use core::marker::PhantomData;

use either::Either::{Left, Right};
use thiserror::Error;

use crate::sans::{
    decode::{EncodeError, decode, encode},
    layout::{CompiledLayout, SchemaError, compile},
    order::ByteOrder,
    pattern::Pattern,
    rebuild::{RebuildError, Structure, Values, flatten, rebuild},
    shape::Shape,
};

use super::Record;

/// Errors occurring while building or using a parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The shape cannot be laid out.
    #[error("Invalid shape: {0}")]
    Schema(#[from] SchemaError),
    /// Decoded values disagree with the shape. This indicates a bug in a
    /// hand-written [`FromValues`](super::FromValues) implementation.
    #[error("Inconsistent record values: {0}")]
    Rebuild(#[from] RebuildError),
    /// A value does not fit the layout.
    #[error("Cannot encode record: {0}")]
    Encode(#[from] EncodeError),
}

/// A parser which has been built and can consume records.
pub trait ParseRecord {
    /// The value produced for each record.
    type Output;

    /// Bytes consumed by each record.
    fn size(&self) -> usize;

    /// Parse one record from the front of a buffer.
    ///
    /// Returns the record and the bytes following it, or `None` and the
    /// untouched buffer if it is too short to hold a record.
    fn parse<'a>(&self, r: &'a [u8]) -> Result<(Option<Self::Output>, &'a [u8]), Error>;
}

/// An unbuilt parser for records of type `T`.
#[derive(Debug, Clone)]
pub struct ParserSpec<T> {
    shape: Shape,
    order: ByteOrder,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Record> ParserSpec<T> {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            shape: T::shape(),
            order,
            _phantom: PhantomData,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Compile the record layout, consuming the description.
    pub fn build(self) -> Result<Parser<T>, Error> {
        let layout = compile(&self.shape, self.order)?;

        Ok(Parser {
            shape: self.shape,
            layout,
            _phantom: PhantomData,
        })
    }
}

impl<T: Record> Default for ParserSpec<T> {
    fn default() -> Self {
        Self::new(ByteOrder::default())
    }
}

/// A built parser for records of type `T`.
///
/// The layout is fixed at build time. Parsing borrows the parser immutably,
/// so one parser may be shared between threads.
#[derive(Debug, Clone)]
pub struct Parser<T> {
    shape: Shape,
    layout: CompiledLayout,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Record> Parser<T> {
    /// Describe and build a parser in one step.
    pub fn new(order: ByteOrder) -> Result<Self, Error> {
        ParserSpec::new(order).build()
    }

    /// Parse one record from the front of a buffer.
    ///
    /// Returns the record and the bytes following it, or `None` and the
    /// untouched buffer if it is too short to hold a record.
    pub fn parse<'a>(&self, r: &'a [u8]) -> Result<(Option<T>, &'a [u8]), Error> {
        let (values, leftover) = match decode(&self.layout, r) {
            Left(decoded) => decoded,
            Right(r) => return Ok((None, r)),
        };

        let mut values = Values::new(values);
        let value = T::from_values(&mut values)?;
        finish(&values)?;

        Ok((Some(value), leftover))
    }

    /// Encode a record into exactly [`size`](Self::size) bytes.
    pub fn encode(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut values = Vec::with_capacity(self.layout.slots().len());
        value.to_values(&mut values);
        Ok(encode(&self.layout, &values)?)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn layout(&self) -> &CompiledLayout {
        &self.layout
    }

    pub fn pattern(&self) -> &Pattern {
        self.layout.pattern()
    }

    pub fn size(&self) -> usize {
        self.layout.size()
    }
}

impl<T: Record> ParseRecord for Parser<T> {
    type Output = T;

    fn size(&self) -> usize {
        Parser::size(self)
    }

    fn parse<'a>(&self, r: &'a [u8]) -> Result<(Option<T>, &'a [u8]), Error> {
        Parser::parse(self, r)
    }
}

/// An unbuilt parser for a shape known only at runtime.
#[derive(Debug, Clone)]
pub struct DynamicSpec {
    shape: Shape,
    order: ByteOrder,
}

impl DynamicSpec {
    pub fn new(shape: Shape, order: ByteOrder) -> Self {
        Self { shape, order }
    }

    /// Compile the record layout, consuming the description.
    pub fn build(self) -> Result<DynamicParser, Error> {
        let layout = compile(&self.shape, self.order)?;

        Ok(DynamicParser {
            shape: self.shape,
            layout,
        })
    }
}

/// A built parser producing [`Structure`] values for a runtime shape.
#[derive(Debug, Clone)]
pub struct DynamicParser {
    shape: Shape,
    layout: CompiledLayout,
}

impl DynamicParser {
    /// Describe and build a parser in one step.
    pub fn new(shape: Shape, order: ByteOrder) -> Result<Self, Error> {
        DynamicSpec::new(shape, order).build()
    }

    /// Parse one record from the front of a buffer.
    ///
    /// Returns the record and the bytes following it, or `None` and the
    /// untouched buffer if it is too short to hold a record.
    pub fn parse<'a>(&self, r: &'a [u8]) -> Result<(Option<Structure>, &'a [u8]), Error> {
        let (values, leftover) = match decode(&self.layout, r) {
            Left(decoded) => decoded,
            Right(r) => return Ok((None, r)),
        };

        let mut values = Values::new(values);
        let value = rebuild(&self.shape, &mut values)?;
        finish(&values)?;

        Ok((Some(value), leftover))
    }

    /// Encode a structure of this parser's shape.
    pub fn encode(&self, value: &Structure) -> Result<Vec<u8>, Error> {
        Ok(encode(&self.layout, &flatten(value))?)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn layout(&self) -> &CompiledLayout {
        &self.layout
    }

    pub fn pattern(&self) -> &Pattern {
        self.layout.pattern()
    }

    pub fn size(&self) -> usize {
        self.layout.size()
    }
}

impl ParseRecord for DynamicParser {
    type Output = Structure;

    fn size(&self) -> usize {
        DynamicParser::size(self)
    }

    fn parse<'a>(&self, r: &'a [u8]) -> Result<(Option<Structure>, &'a [u8]), Error> {
        DynamicParser::parse(self, r)
    }
}

/// Check that a record consumed every decoded value.
fn finish(values: &Values) -> Result<(), RebuildError> {
    match values.remaining() {
        0 => Ok(()),
        remaining => Err(RebuildError::Trailing { remaining }),
    }
}
