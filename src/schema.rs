use jsonschema::validator_for;
use serde_json::{json, Value};

use crate::registry::ParamSpec;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance validation failed")]
    ValidationFailed,
}

/// Build the JSON Schema for a capability's input arguments from its
/// declared parameter spec. Used by `tools/list` so clients can
/// construct valid calls.
pub fn input_schema(params: &[ParamSpec]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in params {
        properties.insert(param.name.clone(), json!({ "type": param.ty.json_type() }));
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
/// Returns Ok(()) if valid, Err otherwise.
pub fn validate_instance(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator =
        validator_for(schema).map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    if validator.is_valid(instance) {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed)
    }
}
