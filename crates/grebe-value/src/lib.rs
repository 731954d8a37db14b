//! Dynamic value model for the Grebe extraction engine.
//!
//! A [`Value`] is either a scalar (null, boolean, integer, float, text,
//! date) stored inline, or a structural node (array, list, map, record,
//! table, structured object) stored behind a shared handle. Cloning a
//! `Value` clones the handle, never the node, so value graphs can be
//! aliased and cyclic — the extraction engine detects cycles through
//! pointer-based [`ValueId`] identity.
//!
//! Scalars deliberately have no identity: they cannot participate in
//! cycles and are excluded from cycle bookkeeping.

mod error;
mod object;
mod structured;
mod value;

pub use error::ValueError;
pub use object::{ArrayHandle, ListHandle, MapHandle, RecordHandle, TableHandle};
pub use structured::{PropertyBag, StructuredValue};
pub use value::{Value, ValueId, ValueKind};
