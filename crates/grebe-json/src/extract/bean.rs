//! Catch-all structural extractor.
//!
//! Always registered last and matches every value: anything no specific
//! extractor claimed ends up here. Structured host objects are rendered
//! property by property through the [`StructuredValue`] seam; remaining
//! scalars become JSON leaves directly.

use super::{Extracted, Extractor, path_fault};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use crate::parse::StringToValue;
use grebe_value::{StructuredValue, Value};

pub struct BeanExtractor;

impl Extractor for BeanExtractor {
    fn matches(&self, _value: &Value) -> bool {
        true
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        match value {
            Value::Structured(object) => {
                self.extract_structured(converter, cx, value, object.as_ref(), path, jsonify)
            }
            scalar => {
                if let Some(segment) = path.pop() {
                    // a path cannot descend into a leaf
                    return path_fault(
                        cx,
                        ConvertError::AttributeNotFound {
                            attribute: segment,
                            kind: scalar.kind().as_str(),
                        },
                    );
                }
                if !jsonify {
                    return Ok(Extracted::Native(scalar.clone()));
                }
                match scalar.to_json_scalar() {
                    Some(json) => Ok(Extracted::Json(json)),
                    None => Err(ConvertError::Internal(format!(
                        "no extractor rendered {} value {scalar}",
                        scalar.kind()
                    ))),
                }
            }
        }
    }

    fn can_set_value(&self) -> bool {
        true
    }

    fn set_value(
        &self,
        parser: &dyn StringToValue,
        owner: &Value,
        attribute: &str,
        raw: &str,
    ) -> Result<Value, ConvertError> {
        let Value::Structured(object) = owner else {
            return Err(ConvertError::ReadOnly {
                kind: owner.kind().as_str(),
            });
        };
        let current = object.property(attribute)?;
        let parsed = parser.convert(&current, raw)?;
        Ok(object.set_property(attribute, parsed)?)
    }
}

impl BeanExtractor {
    fn extract_structured(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        object: &dyn StructuredValue,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        if let Some(segment) = path.pop() {
            return match object.property(&segment) {
                Ok(child) => converter.extract(cx, &child, path, jsonify),
                Err(fault) => path_fault(cx, fault.into()),
            };
        }
        if !jsonify {
            return Ok(Extracted::Native(value.clone()));
        }
        let mut out = serde_json::Map::new();
        for name in object.property_names() {
            match object.property(&name) {
                Ok(child) => {
                    out.insert(name, converter.extract(cx, &child, path, true)?.into_json()?);
                }
                // accessor faults go through the policy: substitute,
                // omit the property, or propagate
                Err(fault) => match cx.fault_handler().handle(fault.into())? {
                    Some(substitute) => {
                        out.insert(name, substitute);
                    }
                    None => {}
                },
            }
        }
        Ok(Extracted::Json(serde_json::Value::Object(out)))
    }
}
