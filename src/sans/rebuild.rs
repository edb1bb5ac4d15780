//! Rebuilding nested values from decoded primitives.

use alloc::{string::String, vec::Vec};

use thiserror::Error;

use super::{
    kind::{Primitive, PrimitiveKind},
    shape::{FieldDescriptor, FieldKind, Shape},
};

/// An error consuming decoded primitives.
///
/// Any variant means the values did not come from the layout of the shape
/// being rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebuildError {
    /// Ran out of values partway through a shape.
    #[error("Ran out of values after consuming {consumed}.")]
    Exhausted { consumed: usize },
    /// Values left over once a shape was complete.
    #[error("{remaining} values left over after a complete record.")]
    Trailing { remaining: usize },
    /// Value of the wrong kind for its field.
    #[error("Expected a value of kind {expected}, found {found}.")]
    Mismatch {
        expected: PrimitiveKind,
        found: PrimitiveKind,
    },
}

/// An ordered stream of decoded primitives, consumed front to back.
#[derive(Debug)]
pub struct Values {
    inner: alloc::vec::IntoIter<Primitive>,
    consumed: usize,
}

impl Values {
    pub fn new(values: Vec<Primitive>) -> Self {
        Self {
            inner: values.into_iter(),
            consumed: 0,
        }
    }

    /// Take the next value.
    pub fn take(&mut self) -> Result<Primitive, RebuildError> {
        let value = self.inner.next().ok_or(RebuildError::Exhausted {
            consumed: self.consumed,
        })?;
        self.consumed += 1;
        Ok(value)
    }

    /// Number of values taken so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of values not yet taken.
    pub fn remaining(&self) -> usize {
        self.inner.len()
    }
}

impl From<Vec<Primitive>> for Values {
    fn from(values: Vec<Primitive>) -> Self {
        Self::new(values)
    }
}

/// A rebuilt field value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    Primitive(Primitive),
    /// A repeated field, one element per repetition.
    Array(Vec<Value>),
    Struct(Structure),
}

impl Value {
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Structure> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<Structure> for Value {
    fn from(s: Structure) -> Self {
        Self::Struct(s)
    }
}

/// Named field values in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Structure {
    fields: Vec<(String, Value)>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Structure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rebuild a value of the given shape, consuming exactly its leaf count.
///
/// Fields are visited in the same order the layout compiler emits slots, so
/// each nested shape consumes exactly its own values and stops at its
/// boundary.
pub fn rebuild(shape: &Shape, values: &mut Values) -> Result<Structure, RebuildError> {
    let fields = shape
        .fields()
        .iter()
        .map(|field| -> Result<_, RebuildError> {
            let value = if field.is_array() {
                let items = (0..field.repeat_count())
                    .map(|_| rebuild_one(field, values))
                    .collect::<Result<_, _>>()?;
                Value::Array(items)
            } else {
                rebuild_one(field, values)?
            };

            Ok((String::from(field.name()), value))
        })
        .collect::<Result<_, _>>()?;

    Ok(Structure { fields })
}

fn rebuild_one(field: &FieldDescriptor, values: &mut Values) -> Result<Value, RebuildError> {
    Ok(match field.kind() {
        FieldKind::Primitive(kind) => {
            let value = values.take()?;

            if value.kind() != *kind {
                Err(RebuildError::Mismatch {
                    expected: *kind,
                    found: value.kind(),
                })?;
            }

            Value::Primitive(value)
        }
        FieldKind::Nested(shape) => Value::Struct(rebuild(shape, values)?),
    })
}

/// Flatten a structure into primitives in slot order.
///
/// The inverse of [`rebuild`]. Field names are ignored; only order matters.
pub fn flatten(structure: &Structure) -> Vec<Primitive> {
    fn visit(value: &Value, out: &mut Vec<Primitive>) {
        match value {
            Value::Primitive(p) => out.push(p.clone()),
            Value::Array(items) => items.iter().for_each(|v| visit(v, out)),
            Value::Struct(s) => s.fields.iter().for_each(|(_, v)| visit(v, out)),
        }
    }

    let mut out = Vec::new();
    structure.fields.iter().for_each(|(_, v)| visit(v, &mut out));
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn frame() -> Shape {
        Shape::new()
            .field(
                "header",
                Shape::new()
                    .field("id", PrimitiveKind::U8)
                    .field("flags", PrimitiveKind::U8),
            )
            .array("samples", PrimitiveKind::I16, 3)
    }

    #[test]
    fn rebuild_nested() {
        let mut values = Values::new(vec![
            Primitive::U8(9),
            Primitive::U8(0b101),
            Primitive::I16(-1),
            Primitive::I16(0),
            Primitive::I16(1),
        ]);

        let structure = rebuild(&frame(), &mut values).unwrap();

        let expected = Structure::new()
            .with(
                "header",
                Structure::new()
                    .with("id", Primitive::U8(9))
                    .with("flags", Primitive::U8(0b101)),
            )
            .with(
                "samples",
                Value::Array(vec![
                    Primitive::I16(-1).into(),
                    Primitive::I16(0).into(),
                    Primitive::I16(1).into(),
                ]),
            );

        assert_eq!(structure, expected);
        assert_eq!(values.consumed(), 5);
        assert_eq!(values.remaining(), 0);
    }

    #[test]
    fn rebuild_stops_at_boundary() {
        let shape = Shape::new().field("a", PrimitiveKind::U8);
        let mut values = Values::new(vec![Primitive::U8(1), Primitive::U8(2)]);

        rebuild(&shape, &mut values).unwrap();

        assert_eq!(values.remaining(), 1);
    }

    #[test]
    fn rebuild_exhausted() {
        let mut values = Values::new(vec![Primitive::U8(9), Primitive::U8(0), Primitive::I16(4)]);

        assert_eq!(
            rebuild(&frame(), &mut values),
            Err(RebuildError::Exhausted { consumed: 3 })
        );
    }

    #[test]
    fn rebuild_mismatch() {
        let shape = Shape::new().field("a", PrimitiveKind::U32);
        let mut values = Values::new(vec![Primitive::I32(1)]);

        assert_eq!(
            rebuild(&shape, &mut values),
            Err(RebuildError::Mismatch {
                expected: PrimitiveKind::U32,
                found: PrimitiveKind::I32,
            })
        );
    }

    #[test]
    fn rebuild_repeated_nested() {
        let point = Shape::new()
            .field("x", PrimitiveKind::I8)
            .field("y", PrimitiveKind::I8);
        let shape = Shape::new().array("points", point, 2);
        let mut values = Values::new(vec![
            Primitive::I8(1),
            Primitive::I8(2),
            Primitive::I8(3),
            Primitive::I8(4),
        ]);

        let structure = rebuild(&shape, &mut values).unwrap();

        let points = structure.get("points").and_then(Value::as_array).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(
            points[1].as_struct().and_then(|p| p.get("y")),
            Some(&Value::Primitive(Primitive::I8(4)))
        );
    }

    #[test]
    fn flatten_inverts_rebuild() {
        let flat = vec![
            Primitive::U8(1),
            Primitive::U8(2),
            Primitive::I16(3),
            Primitive::I16(4),
            Primitive::I16(5),
        ];

        let structure = rebuild(&frame(), &mut Values::new(flat.clone())).unwrap();

        assert_eq!(flatten(&structure), flat);
    }
}
