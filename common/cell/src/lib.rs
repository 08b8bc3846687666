//! Bit/reference cells of the lending chain: building, reading, dictionaries,
//! bag-of-cells serialization and full-inclusion merkle proofs.

mod address;
mod boc;
mod builder;
mod cell;
mod dict;
mod error;
mod slice;

pub use address::StdAddress;
pub use boc::{from_boc, from_boc_hex};
pub use builder::CellBuilder;
pub use cell::{Cell, CellKind, CellRef, MAX_BITS, MAX_DEPTH, MAX_REFS};
pub use dict::Dictionary;
pub use error::{CellError, CellResult};
pub use slice::CellSlice;
