#![no_std]

//! Compile declared record shapes into packed binary layouts, and decode
//! fixed-width records with them.
//!
//! Packform targets formats where every field has a known width and
//! position: sensor telemetry, protocol headers, fixed-size file records. A
//! record is described once, compiled into a flat layout of primitive slots
//! under a single byte order, and then used to decode any number of buffers.
//! There is no padding or alignment; a record occupies exactly the sum of its
//! field widths.
//!
//! Most users should begin with the [`Parser`](avec::Parser) and the
//! [`Record`](macro@avec::Record) derive macro in the [`avec`] module. Shapes
//! known only at runtime are handled by [`DynamicParser`](avec::DynamicParser).
//! The layout machinery itself is exposed in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `serde`: implement `Serialize` for shapes and rebuilt values.

extern crate alloc;

pub mod avec;
pub mod sans;

#[doc(hidden)]
pub mod __private {
    pub use alloc::vec::Vec;
}
