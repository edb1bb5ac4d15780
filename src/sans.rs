//! Layout machinery underneath the parsers.
//!
//! This module is intended for applications that work with shapes directly,
//! or that need to drive compilation, decoding and rebuilding as separate
//! steps. See [`crate::avec`] for the parsers built on top of it.
//!
//! # Architecture
//!
//! Building a parser runs once:
//!
//! 1. A [`Shape`](shape::Shape) describes a record as an ordered tree of
//!    fields.
//! 2. The [layout compiler](layout::compile) walks the shape depth-first and
//!    emits one [`Slot`](layout::Slot) per primitive, repeated fields once per
//!    repetition, nested shapes spliced in place. Every slot takes the same
//!    [`ByteOrder`](order::ByteOrder).
//! 3. The [pattern formatter](pattern::format) renders the slots as a compact
//!    [`Pattern`](pattern::Pattern).
//!
//! Parsing then runs per buffer:
//!
//! 1. The [decoder](decode::decode) checks the buffer holds a whole record,
//!    decodes one [`Primitive`](kind::Primitive) per slot, and hands back the
//!    bytes after the record untouched.
//! 2. The [rebuilder](rebuild::rebuild) walks the shape in the same order as
//!    the compiler, consuming the primitives to rebuild the nested value.
//!
//! Compiler and rebuilder must visit fields in the same order. Nothing else
//! connects a slot to the field it came from.

pub mod decode;
pub mod kind;
pub mod layout;
pub mod order;
pub mod pattern;
pub mod rebuild;
pub mod shape;
