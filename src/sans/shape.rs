//! Declarative descriptions of record shapes.
//!
//! A [`Shape`] is an ordered list of fields, where declaration order is wire
//! order. Each field names either a primitive or a nested shape, and repeats
//! some fixed number of times. Nested shapes are owned by their parent, so a
//! shape can never contain itself.

use alloc::{string::String, vec::Vec};

use super::kind::PrimitiveKind;

/// What a single field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    Primitive(PrimitiveKind),
    Nested(Shape),
}

impl From<PrimitiveKind> for FieldKind {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<Shape> for FieldKind {
    fn from(shape: Shape) -> Self {
        Self::Nested(shape)
    }
}

/// A named field of a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    repeat: usize,
}

impl FieldDescriptor {
    /// Describe a scalar field.
    pub fn new(name: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            repeat: 1,
        }
    }

    /// Repeat this field a fixed number of times, making it an array.
    ///
    /// A count of zero is accepted here and rejected when compiling.
    pub fn repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn repeat_count(&self) -> usize {
        self.repeat
    }

    /// Whether this field rebuilds as a sequence rather than a single value.
    pub fn is_array(&self) -> bool {
        self.repeat != 1
    }
}

/// An ordered list of fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Shape {
    fields: Vec<FieldDescriptor>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn with(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a scalar field.
    pub fn field(self, name: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        self.with(FieldDescriptor::new(name, kind))
    }

    /// Append a fixed-size array field.
    pub fn array(
        self,
        name: impl Into<String>,
        kind: impl Into<FieldKind>,
        repeat: usize,
    ) -> Self {
        self.with(FieldDescriptor::new(name, kind).repeat(repeat))
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of primitive slots this shape expands to, saturating at
    /// `usize::MAX`.
    pub fn leaf_count(&self) -> usize {
        self.fields.iter().fold(0usize, |total, f| {
            let count = match &f.kind {
                FieldKind::Primitive(_) => 1,
                FieldKind::Nested(shape) => shape.leaf_count(),
            };
            total.saturating_add(count.saturating_mul(f.repeat))
        })
    }
}

impl FromIterator<FieldDescriptor> for Shape {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
