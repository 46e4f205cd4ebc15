//! Request dispatcher: pattern matching, argument binding, handler
//! invocation, and envelope wrapping.
//!
//! Each dispatch is stateless apart from the shared lifecycle context.
//! Request-time failures are returned as [`DispatchError`] values and
//! never crash the loop or touch the registry.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::context::AppContext;
use crate::registry::{
    BoundArgs, CapabilityKind, CapabilityRecord, Payload, Registry, RequestUri,
};

/// The normalized response wrapper returned for every successful dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentEnvelope {
    pub kind: CapabilityKind,
    pub content_type: String,
    pub payload: Payload,
}

/// Request-time errors. Recoverable per request: converted to an error
/// envelope by the protocol layer and returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("no {kind} registered for {identifier:?}")]
    NotFound {
        kind: CapabilityKind,
        identifier: String,
    },

    #[error("cannot bind arguments for {identifier:?}: {reason}")]
    ArgumentBinding { identifier: String, reason: String },

    #[error("handler for {identifier:?} failed: {message}")]
    HandlerExecution { identifier: String, message: String },
}

/// Finds the best-matching record for a request, binds parameters,
/// invokes the handler, and wraps the result.
pub struct Dispatcher {
    registry: Arc<Registry>,
    context: Arc<AppContext>,
    handler_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, context: Arc<AppContext>, handler_timeout: Duration) -> Self {
        Self {
            registry,
            context,
            handler_timeout,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch one request to its capability.
    ///
    /// Resources resolve through template matching on `identifier`;
    /// tools and prompts resolve by exact literal lookup and bind
    /// `raw_arguments` against their declared parameter spec.
    pub async fn dispatch(
        &self,
        kind: CapabilityKind,
        identifier: &str,
        raw_arguments: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Result<ContentEnvelope, DispatchError> {
        let (record, args) = match kind {
            CapabilityKind::Resource => self.bind_resource(identifier)?,
            CapabilityKind::Tool | CapabilityKind::Prompt => {
                self.bind_literal(kind, identifier, raw_arguments)?
            }
        };
        self.invoke(record, args, identifier).await
    }

    /// Resolve a templated identifier to the best-matching record.
    ///
    /// Among candidates (same scheme, same segment count, literal
    /// segments equal) the one with the fewest variable slots wins; a
    /// remaining tie goes to the earliest registration. The strict `<`
    /// comparison below keeps the earlier record on equal slot counts,
    /// which makes the order total and reproducible.
    fn bind_resource(
        &self,
        identifier: &str,
    ) -> Result<(&CapabilityRecord, BoundArgs), DispatchError> {
        let not_found = || DispatchError::NotFound {
            kind: CapabilityKind::Resource,
            identifier: identifier.to_string(),
        };

        let uri = RequestUri::parse(identifier).ok_or_else(not_found)?;

        let mut best: Option<(&CapabilityRecord, Vec<(String, crate::registry::ParamType, String)>)> =
            None;
        for record in self.registry.list(CapabilityKind::Resource) {
            if let Some(captures) = record.pattern.match_uri(&uri) {
                let better = match &best {
                    None => true,
                    Some((current, _)) => {
                        record.pattern.variable_count() < current.pattern.variable_count()
                    }
                };
                if better {
                    best = Some((record, captures));
                }
            }
        }
        let (record, captures) = best.ok_or_else(not_found)?;

        let mut args = BoundArgs::default();
        for (name, ty, text) in captures {
            let value = ty
                .convert_text(&text)
                .map_err(|reason| DispatchError::ArgumentBinding {
                    identifier: identifier.to_string(),
                    reason: format!("variable {name:?}: {reason}"),
                })?;
            args.insert(name, value);
        }
        Ok((record, args))
    }

    /// Exact lookup for tools and prompts, then bind the caller's
    /// arguments against the declared parameter spec.
    fn bind_literal(
        &self,
        kind: CapabilityKind,
        identifier: &str,
        raw_arguments: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Result<(&CapabilityRecord, BoundArgs), DispatchError> {
        let record =
            self.registry
                .find_exact(kind, identifier)
                .ok_or_else(|| DispatchError::NotFound {
                    kind,
                    identifier: identifier.to_string(),
                })?;

        let binding_err = |reason: String| DispatchError::ArgumentBinding {
            identifier: identifier.to_string(),
            reason,
        };

        let empty = serde_json::Map::new();
        let raw = raw_arguments.unwrap_or(&empty);

        if let Some(unknown) = raw.keys().find(|k| !record.params.iter().any(|p| &p.name == *k)) {
            return Err(binding_err(format!("unknown parameter {unknown:?}")));
        }

        let mut args = BoundArgs::default();
        for param in &record.params {
            match raw.get(&param.name) {
                Some(value) => {
                    let converted = param.ty.convert_json(value).map_err(|reason| {
                        binding_err(format!("parameter {:?}: {reason}", param.name))
                    })?;
                    args.insert(param.name.clone(), converted);
                }
                None if param.required => {
                    return Err(binding_err(format!(
                        "missing required parameter {:?}",
                        param.name
                    )));
                }
                None => {
                    args.insert(param.name.clone(), crate::registry::ArgValue::Absent);
                }
            }
        }
        Ok((record, args))
    }

    /// Run the handler as a spawned task under the configured timeout.
    ///
    /// A logical handler failure, a panic, a task abort, and a timeout
    /// all surface as `HandlerExecutionError`; none of them propagates.
    async fn invoke(
        &self,
        record: &CapabilityRecord,
        args: BoundArgs,
        identifier: &str,
    ) -> Result<ContentEnvelope, DispatchError> {
        let execution_err = |message: String| DispatchError::HandlerExecution {
            identifier: identifier.to_string(),
            message,
        };

        let future = (record.handler)(args, Arc::clone(&self.context));
        let task = tokio::spawn(future);
        let abort = task.abort_handle();

        match tokio::time::timeout(self.handler_timeout, task).await {
            Ok(Ok(Ok(payload))) => {
                let content_type = match &payload {
                    Payload::Text(_) => "text",
                    Payload::Structured(_) => "json",
                };
                Ok(ContentEnvelope {
                    kind: record.kind,
                    content_type: content_type.to_string(),
                    payload,
                })
            }
            Ok(Ok(Err(handler_err))) => Err(execution_err(handler_err.message)),
            Ok(Err(join_err)) => {
                if join_err.is_cancelled() {
                    Err(execution_err("cancelled".to_string()))
                } else {
                    tracing::error!(identifier, error = %join_err, "handler task panicked");
                    Err(execution_err("handler panicked".to_string()))
                }
            }
            Err(_) => {
                abort.abort();
                tracing::warn!(
                    identifier,
                    timeout_secs = self.handler_timeout.as_secs(),
                    "handler cancelled by timeout"
                );
                Err(execution_err(format!(
                    "cancelled after {} seconds",
                    self.handler_timeout.as_secs()
                )))
            }
        }
    }
}
