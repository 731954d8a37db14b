//! Bounded extraction of in-memory value graphs into JSON trees.
//!
//! The engine converts arbitrary, possibly cyclic, [`grebe_value::Value`]
//! graphs into `serde_json` trees while protecting callers from runaway
//! input: traversal depth, collection sizes and the total number of
//! visited nodes are all capped, and hitting a cap degrades the output to
//! a placeholder instead of failing the call. A caller can also extract
//! just one nested value by supplying a path of attribute/index segments.
//!
//! ## Architecture
//!
//! - [`JsonConverter`] — the orchestrator. Owns the extractor chain and
//!   the process-wide hard limits; one shared instance serves concurrent
//!   calls.
//! - [`SerializationContext`] — per-call state (active ancestry, visited
//!   identities, counters, effective limits, fault handler), created for
//!   one `convert_to_json` call and threaded `&mut` through every
//!   recursive step. Two calls can never observe each other's context.
//! - [`Extractor`] chain — one handler per value shape, consulted in
//!   registration order, first match wins. Arrays bypass the chain and go
//!   to a dedicated extractor.
//! - [`ValueFaultHandler`] — injected policy deciding whether an
//!   unresolvable path segment or failing property accessor raises,
//!   substitutes, or suppresses.

pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod extract;
pub mod fault;
pub mod parse;
pub mod request;

pub use config::{ConfigKey, ProcessingConfig};
pub use context::SerializationContext;
pub use convert::{JsonConverter, reverse_path};
pub use error::ConvertError;
pub use extract::{Extracted, Extractor, default_simplifiers};
pub use fault::{IgnoringValueFaultHandler, ThrowingValueFaultHandler, ValueFaultHandler};
pub use parse::{SimpleStringToValue, StringToValue};
pub use request::{JsonRequest, SerializeRequest};
