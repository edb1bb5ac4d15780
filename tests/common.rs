use packform::{
    avec::{DynamicParser, DynamicSpec, Error, parse_all},
    sans::{
        kind::{Primitive, PrimitiveKind},
        layout::SchemaError,
        order::ByteOrder,
        rebuild::{Structure, Value},
        shape::{FieldDescriptor, Shape},
    },
};

fn point() -> Shape {
    Shape::new()
        .field("x", PrimitiveKind::U16)
        .field("y", PrimitiveKind::U16)
}

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

const FRAME: [u8; 8] = [0x2A, 0x81, 0x00, 0x01, 0xFF, 0xFF, 0x7F, 0xFF];

#[test]
fn parse_native_point() {
    let parser = DynamicParser::new(point(), ByteOrder::Native).unwrap();

    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_ne_bytes());
    data.extend_from_slice(&2u16.to_ne_bytes());

    let (value, leftover) = parser.parse(&data).unwrap();

    let expected = Structure::new()
        .with("x", Primitive::U16(1))
        .with("y", Primitive::U16(2));
    assert_eq!(value, Some(expected));
    assert!(leftover.is_empty());
}

#[test]
fn parse_nested_big_endian() {
    let parser = DynamicSpec::new(frame(), ByteOrder::Big).build().unwrap();
    assert_eq!(parser.size(), 8);
    assert_eq!(parser.pattern().to_string(), ">BBhhh");

    let (value, leftover) = parser.parse(&FRAME).unwrap();
    let value = value.unwrap();

    let header = value.get("header").and_then(Value::as_struct).unwrap();
    assert_eq!(header.get("id"), Some(&Value::Primitive(Primitive::U8(42))));
    assert_eq!(
        header.get("flags"),
        Some(&Value::Primitive(Primitive::U8(0x81)))
    );

    let samples = value.get("samples").and_then(Value::as_array).unwrap();
    let samples: Vec<_> = samples.iter().filter_map(Value::as_primitive).collect();
    assert_eq!(
        samples,
        [
            &Primitive::I16(1),
            &Primitive::I16(-1),
            &Primitive::I16(i16::MAX)
        ]
    );
    assert!(leftover.is_empty());
}

#[test]
fn parse_short_buffer() {
    let parser = DynamicParser::new(frame(), ByteOrder::Big).unwrap();

    let (value, leftover) = parser.parse(&FRAME[..5]).unwrap();

    assert_eq!(value, None);
    assert_eq!(leftover, &FRAME[..5]);
}

#[test]
fn parse_with_leftover() {
    let parser = DynamicParser::new(frame(), ByteOrder::Big).unwrap();

    let mut data = FRAME.to_vec();
    data.extend_from_slice(&[9, 8, 7]);

    let (value, leftover) = parser.parse(&data).unwrap();

    assert!(value.is_some());
    assert_eq!(leftover, [9, 8, 7]);
}

#[test]
fn parse_empty_buffer() {
    let parser = DynamicParser::new(point(), ByteOrder::Little).unwrap();

    let (value, leftover) = parser.parse(b"").unwrap();

    assert_eq!(value, None);
    assert!(leftover.is_empty());
}

#[test]
fn parse_is_repeatable() {
    let parser = DynamicParser::new(frame(), ByteOrder::Network).unwrap();

    let (first, _) = parser.parse(&FRAME).unwrap();
    let (second, _) = parser.parse(&FRAME).unwrap();

    assert_eq!(first, second);
}

#[test]
fn parse_bytes_and_bools() {
    let shape = Shape::new()
        .field("magic", PrimitiveKind::Bytes(4))
        .array("flags", PrimitiveKind::Bool, 2)
        .field("scale", PrimitiveKind::F64);
    let parser = DynamicParser::new(shape, ByteOrder::Little).unwrap();

    let mut data = b"PKFM\x01\x00".to_vec();
    data.extend_from_slice(&0.5f64.to_le_bytes());

    let (value, _) = parser.parse(&data).unwrap();
    let value = value.unwrap();

    assert_eq!(
        value.get("magic"),
        Some(&Value::Primitive(Primitive::Bytes(b"PKFM".to_vec())))
    );
    assert_eq!(
        value.get("flags"),
        Some(&Value::Array(vec![
            Primitive::Bool(true).into(),
            Primitive::Bool(false).into(),
        ]))
    );
    assert_eq!(
        value.get("scale"),
        Some(&Value::Primitive(Primitive::F64(0.5)))
    );
}

#[test]
fn encode_then_parse() {
    let parser = DynamicParser::new(frame(), ByteOrder::Big).unwrap();

    let (value, _) = parser.parse(&FRAME).unwrap();
    let encoded = parser.encode(&value.unwrap()).unwrap();

    assert_eq!(encoded, FRAME);
}

#[test]
fn parse_all_stops_at_partial_record() {
    let parser = DynamicParser::new(point(), ByteOrder::Big).unwrap();
    let data = [0, 1, 0, 2, 0, 3, 0, 4, 0xEE];

    let mut records = parse_all(&parser, &data);
    let xs: Vec<_> = records
        .by_ref()
        .map(|r| r.unwrap().get("x").cloned())
        .collect();

    assert_eq!(
        xs,
        [
            Some(Value::Primitive(Primitive::U16(1))),
            Some(Value::Primitive(Primitive::U16(3))),
        ]
    );
    assert_eq!(records.remainder(), [0xEE]);
}

#[test]
fn parse_all_empty_layout() {
    let parser = DynamicParser::new(Shape::new(), ByteOrder::Native).unwrap();
    let data = [1, 2, 3];

    let mut records = parse_all(&parser, &data);

    assert!(records.next().is_none());
    assert_eq!(records.remainder(), data);
}

#[test]
fn build_rejects_zero_repeat() {
    let shape = point().with(FieldDescriptor::new("z", PrimitiveKind::U16).repeat(0));

    assert_eq!(
        DynamicParser::new(shape, ByteOrder::Native).unwrap_err(),
        Error::Schema(SchemaError::ZeroRepeat { field: "z".into() })
    );
}

#[test]
fn build_rejects_empty_bytes() {
    let shape = Shape::new().field("tag", PrimitiveKind::Bytes(0));

    assert!(matches!(
        DynamicParser::new(shape, ByteOrder::Native),
        Err(Error::Schema(SchemaError::EmptyBytes { .. }))
    ));
}

#[test]
fn build_rejects_duplicate_names() {
    let shape = point().field("x", PrimitiveKind::U8);

    assert!(matches!(
        DynamicParser::new(shape, ByteOrder::Native),
        Err(Error::Schema(SchemaError::DuplicateField { .. }))
    ));
}

#[test]
fn build_rejects_oversized_shape() {
    let shape = point().array("rows", point(), usize::MAX / 2);

    assert_eq!(
        DynamicParser::new(shape, ByteOrder::Big).unwrap_err(),
        Error::Schema(SchemaError::TooLarge {
            field: "rows".into()
        })
    );
}

#[test]
fn shape_from_kind_names() {
    let shape = [("id", "uint32"), ("ratio", "float32"), ("ok", "bool")]
        .into_iter()
        .map(|(name, kind)| -> Result<_, SchemaError> {
            Ok(FieldDescriptor::new(name, kind.parse::<PrimitiveKind>()?))
        })
        .collect::<Result<Shape, SchemaError>>()
        .unwrap();

    let parser = DynamicParser::new(shape, ByteOrder::Little).unwrap();

    assert_eq!(parser.size(), 9);
    assert_eq!(parser.pattern().to_string(), "<If?");
}

#[test]
fn shape_from_unknown_kind_name() {
    let kind = "complex128".parse::<PrimitiveKind>();

    assert_eq!(kind, Err(SchemaError::UnknownKind("complex128".into())));
}
