use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::pattern::UriPattern;
use super::value::{ArgValue, ParamType};
use crate::context::AppContext;

/// The three capability kinds the registry distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Resource,
    Tool,
    Prompt,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Tool => "tool",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared handler parameter: name, scalar type, required flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
        }
    }
}

/// Arguments after binding, as handed to a handler.
///
/// Every declared parameter has an entry: either its converted value or
/// [`ArgValue::Absent`] for an optional parameter the caller omitted.
#[derive(Debug, Clone, Default)]
pub struct BoundArgs {
    values: BTreeMap<String, ArgValue>,
}

impl BoundArgs {
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Convenience accessor: the string value of `name`, if present and
    /// of string type.
    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(ArgValue::as_str)
    }

    pub fn int_arg(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(ArgValue::as_int)
    }

    pub fn float_arg(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(ArgValue::as_float)
    }

    pub fn bool_arg(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(ArgValue::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// What a handler produces on success: plain text or a structured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Structured(serde_json::Value),
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Render the payload as text for protocol surfaces that carry only
    /// strings (tool results, resource contents).
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Structured(v) => v.to_string(),
        }
    }
}

/// A logical, content-level handler failure (e.g. an invalid query).
///
/// Caught by the dispatcher and wrapped as a `HandlerExecutionError`;
/// never allowed to propagate as an unhandled fault.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Boxed future returned by a handler invocation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Payload, HandlerError>> + Send>>;

/// A registered handler: bound arguments plus the shared lifecycle
/// context in, a payload or a logical failure out.
pub type Handler = Arc<dyn Fn(BoundArgs, Arc<AppContext>) -> HandlerFuture + Send + Sync>;

/// Binds one identifier pattern to a handler, its declared parameter
/// shapes, and descriptive metadata. Created once at declaration time,
/// immutable thereafter, owned exclusively by the registry.
#[derive(Clone)]
pub struct CapabilityRecord {
    pub kind: CapabilityKind,
    pub pattern: UriPattern,
    pub handler: Handler,
    pub params: Vec<ParamSpec>,
    pub description: String,
}

impl fmt::Debug for CapabilityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRecord")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.raw())
            .field("params", &self.params)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
