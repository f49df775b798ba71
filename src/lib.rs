//! A JSON number codec and document writer, built against a pluggable allocator.
//!
//! Two independent subsystems live here:
//!
//! - [`number`] (re-exported at the crate root as [`scan`]/[`ScanFlags`]) classifies a JSON
//!   numeric lexeme into a [`Value`], parsing decimals to `f64` with 0 ULP error and formatting
//!   `f64`/integers back to the shortest decimal that round-trips.
//! - [`writer`] walks a [`Value`] tree and serializes it to compact or pretty JSON against any
//!   [`allocator::Allocator`], never recursing (so traversal depth is bounded by the frame stack
//!   chosen at the call site, not by the host's call stack).
//!
//! Both subsystems work without `alloc`: a document limited to scalars (no `Value::Arr`/`Obj`,
//! which only exist under the `alloc` feature) can still be scanned and written on a bare `no_std`
//! target using [`writer::write_bounded`] and a fixed-size [`allocator::PoolAllocator`].

#![no_std]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod error;
mod number;
#[cfg(feature = "alloc")]
mod reader;
mod value;

pub mod allocator;
pub mod writer;

pub use error::Error;
pub use number::{scan, ScanFlags};
#[cfg(feature = "alloc")]
pub use reader::{parse, StringArena};
#[cfg(feature = "alloc")]
pub use value::Document;
pub use value::Value;
