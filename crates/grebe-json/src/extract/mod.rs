//! The extractor chain: one handler per value shape.
//!
//! Extractors are consulted in registration order and the first one whose
//! shape predicate accepts the value wins, so specific shapes must be
//! registered before the generic shapes they also satisfy (tables are
//! map-shaped and must come before the map extractor; the bean extractor
//! matches everything and comes last). Arrays never consult the chain —
//! the converter holds a dedicated [`ArrayExtractor`].
//!
//! Extractors cooperate on path navigation: each one pops the leading
//! segment of the path stack to descend one level and hands the remainder
//! back to [`JsonConverter::extract`] with the caller's context.

mod array;
mod bean;
mod date;
mod list;
mod map;
mod record;
mod simplifier;
mod table;

pub use array::ArrayExtractor;
pub use bean::BeanExtractor;
pub use date::DateExtractor;
pub use list::ListExtractor;
pub use map::MapExtractor;
pub use record::RecordExtractor;
pub use simplifier::UrlSimplifier;
pub use table::TableExtractor;

use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use crate::parse::StringToValue;
use grebe_value::Value;

/// Result of one extraction step: a JSON tree or the addressed value
/// itself, selected by the `jsonify` flag.
pub enum Extracted {
    Json(serde_json::Value),
    Native(Value),
}

impl Extracted {
    /// Unwrap the JSON form. A native value here means an extractor
    /// ignored `jsonify`, which is a programming error.
    pub fn into_json(self) -> Result<serde_json::Value, ConvertError> {
        match self {
            Extracted::Json(json) => Ok(json),
            Extracted::Native(value) => Err(ConvertError::Internal(format!(
                "expected JSON form, got native {} value",
                value.kind()
            ))),
        }
    }

    /// Unwrap the native form
    pub fn into_native(self) -> Result<Value, ConvertError> {
        match self {
            Extracted::Native(value) => Ok(value),
            Extracted::Json(json) => Err(ConvertError::Internal(format!(
                "expected native value, got JSON form {json}"
            ))),
        }
    }
}

/// A type-specific handler for one value shape.
pub trait Extractor: Send + Sync {
    /// Shape predicate: does this extractor claim the value?
    fn matches(&self, value: &Value) -> bool;

    /// Produce the value's representation, consuming leading path
    /// segments to descend into it first when a path remains.
    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError>;

    /// Whether this extractor can write into values it claims
    fn can_set_value(&self) -> bool {
        false
    }

    /// Write a slot of `owner`, returning the previous value. Only
    /// meaningful when [`can_set_value`](Extractor::can_set_value) is
    /// true.
    fn set_value(
        &self,
        parser: &dyn StringToValue,
        owner: &Value,
        attribute: &str,
        raw: &str,
    ) -> Result<Value, ConvertError> {
        let _ = (parser, attribute, raw);
        Err(ConvertError::Internal(format!(
            "extractor for {} values declares no write capability",
            owner.kind()
        )))
    }
}

/// The statically assembled default simplifier set, used when the caller
/// registers none.
pub fn default_simplifiers() -> Vec<Box<dyn Extractor>> {
    vec![Box::new(UrlSimplifier)]
}

/// Route a fault raised while resolving a path segment. Suppression has
/// no parent object to omit the branch from, so it degrades to JSON null.
pub(crate) fn path_fault(
    cx: &SerializationContext,
    fault: ConvertError,
) -> Result<Extracted, ConvertError> {
    Ok(Extracted::Json(cx.handle_fault(fault)?))
}

/// Parse a path segment as a sequence index
pub(crate) fn parse_index(segment: &str) -> Result<usize, ConvertError> {
    segment.parse().map_err(|_| ConvertError::InvalidIndex {
        segment: segment.to_string(),
    })
}

/// Shared descent/serialization for index-addressed nodes (lists and
/// arrays behave identically once their children are snapshotted).
pub(crate) fn extract_indexed(
    converter: &JsonConverter,
    cx: &mut SerializationContext,
    owner: &Value,
    items: &[Value],
    path: &mut Vec<String>,
    jsonify: bool,
) -> Result<Extracted, ConvertError> {
    if let Some(segment) = path.pop() {
        let index = match parse_index(&segment) {
            Ok(index) => index,
            Err(fault) => return path_fault(cx, fault),
        };
        return match items.get(index) {
            Some(child) => converter.extract(cx, child, path, jsonify),
            None => path_fault(
                cx,
                ConvertError::IndexOutOfRange {
                    index,
                    len: items.len(),
                },
            ),
        };
    }
    if !jsonify {
        return Ok(Extracted::Native(owner.clone()));
    }
    let len = cx.effective_collection_size(items.len());
    let mut out = Vec::with_capacity(len);
    for child in &items[..len] {
        out.push(converter.extract(cx, child, path, true)?.into_json()?);
    }
    Ok(Extracted::Json(serde_json::Value::Array(out)))
}
