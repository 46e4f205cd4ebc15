//! Capability registry: append-only (at setup time) mapping from
//! capability kind to its registered records.
//!
//! The registry is populated once at startup by the declaration layer,
//! then consumed read-only by the dispatcher and the introspection
//! service. No handler is ever invoked during registration.

pub mod pattern;
pub mod record;
pub mod value;

use std::sync::Arc;

pub use pattern::{RequestUri, Segment, UriPattern};
pub use record::{
    BoundArgs, CapabilityKind, CapabilityRecord, Handler, HandlerError, HandlerFuture, ParamSpec,
    Payload,
};
pub use value::{ArgValue, ParamType};

use crate::context::AppContext;

/// Declaration-time errors. All of these are configuration errors and
/// must abort registration rather than allow a half-configured registry
/// to serve requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("malformed pattern {pattern:?}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("unsupported parameter type {ty:?} in pattern {pattern:?}")]
    UnsupportedType { pattern: String, ty: String },

    #[error("duplicate {kind} identifier {identifier:?}")]
    DuplicateIdentifier {
        kind: CapabilityKind,
        identifier: String,
    },

    #[error("handler signature for {identifier:?} does not fit its pattern: {reason}")]
    InvalidHandlerSignature { identifier: String, reason: String },
}

/// Kind-partitioned table of capability records, insertion order
/// preserved for deterministic introspection and match tie-breaking.
#[derive(Debug, Default)]
pub struct Registry {
    resources: Vec<CapabilityRecord>,
    tools: Vec<CapabilityRecord>,
    prompts: Vec<CapabilityRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability with an explicit parameter spec.
    ///
    /// Resources take a templated (or literal) URI pattern; tools and
    /// prompts take a plain literal name. Fails fast on malformed
    /// patterns, unsupported slot types, duplicate literal identifiers
    /// of the same kind, and parameter specs that cannot be mapped onto
    /// the pattern's variable slots.
    pub fn register(
        &mut self,
        kind: CapabilityKind,
        identifier: &str,
        params: Vec<ParamSpec>,
        description: &str,
        handler: Handler,
    ) -> Result<(), RegistryError> {
        let pattern = match kind {
            CapabilityKind::Resource => UriPattern::parse(identifier)?,
            CapabilityKind::Tool | CapabilityKind::Prompt => UriPattern::literal(identifier)?,
        };

        validate_signature(kind, &pattern, &params)?;

        if pattern.is_literal() && self.find_exact(kind, pattern.raw()).is_some() {
            return Err(RegistryError::DuplicateIdentifier {
                kind,
                identifier: pattern.raw().to_string(),
            });
        }

        self.records_mut(kind).push(CapabilityRecord {
            kind,
            pattern,
            handler,
            params,
            description: description.to_string(),
        });
        Ok(())
    }

    /// Register a resource. The parameter spec is derived from the
    /// pattern's variable slots: one required parameter per slot, typed
    /// as declared.
    pub fn resource<F>(
        &mut self,
        pattern: &str,
        description: &str,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(BoundArgs, Arc<AppContext>) -> HandlerFuture + Send + Sync + 'static,
    {
        let parsed = UriPattern::parse(pattern)?;
        let params = parsed
            .variables()
            .map(|(name, ty)| ParamSpec::required(name, ty))
            .collect();
        self.register(
            CapabilityKind::Resource,
            pattern,
            params,
            description,
            Arc::new(handler),
        )
    }

    /// Register a tool under a literal name with declared parameters.
    pub fn tool<F>(
        &mut self,
        name: &str,
        params: Vec<ParamSpec>,
        description: &str,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(BoundArgs, Arc<AppContext>) -> HandlerFuture + Send + Sync + 'static,
    {
        self.register(
            CapabilityKind::Tool,
            name,
            params,
            description,
            Arc::new(handler),
        )
    }

    /// Register a prompt under a literal name with declared parameters.
    pub fn prompt<F>(
        &mut self,
        name: &str,
        params: Vec<ParamSpec>,
        description: &str,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(BoundArgs, Arc<AppContext>) -> HandlerFuture + Send + Sync + 'static,
    {
        self.register(
            CapabilityKind::Prompt,
            name,
            params,
            description,
            Arc::new(handler),
        )
    }

    /// All records of a kind, in registration order.
    pub fn list(&self, kind: CapabilityKind) -> &[CapabilityRecord] {
        match kind {
            CapabilityKind::Resource => &self.resources,
            CapabilityKind::Tool => &self.tools,
            CapabilityKind::Prompt => &self.prompts,
        }
    }

    /// Literal lookup by exact identifier. Templated patterns never
    /// match here; they are resolved by the dispatcher's matching rule.
    pub fn find_exact(&self, kind: CapabilityKind, identifier: &str) -> Option<&CapabilityRecord> {
        self.list(kind)
            .iter()
            .find(|r| r.pattern.is_literal() && r.pattern.raw() == identifier)
    }

    fn records_mut(&mut self, kind: CapabilityKind) -> &mut Vec<CapabilityRecord> {
        match kind {
            CapabilityKind::Resource => &mut self.resources,
            CapabilityKind::Tool => &mut self.tools,
            CapabilityKind::Prompt => &mut self.prompts,
        }
    }
}

/// Check that the declared parameters can be mapped onto the pattern.
///
/// For resources: declared parameters and pattern variable slots must
/// correspond one-to-one by name, with matching types, and every slot
/// parameter is required (a path segment is always present when the
/// pattern matches). For tools and prompts any parameter list is
/// accepted; only duplicate names are rejected.
fn validate_signature(
    kind: CapabilityKind,
    pattern: &UriPattern,
    params: &[ParamSpec],
) -> Result<(), RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidHandlerSignature {
        identifier: pattern.raw().to_string(),
        reason,
    };

    for (i, param) in params.iter().enumerate() {
        if params[..i].iter().any(|p| p.name == param.name) {
            return Err(invalid(format!("duplicate parameter {:?}", param.name)));
        }
    }

    if kind != CapabilityKind::Resource {
        return Ok(());
    }

    for (name, ty) in pattern.variables() {
        match params.iter().find(|p| p.name == name) {
            None => {
                return Err(invalid(format!("no parameter for variable slot {name:?}")));
            }
            Some(param) if param.ty != ty => {
                return Err(invalid(format!(
                    "parameter {name:?} is declared {} but the slot is {}",
                    param.ty.name(),
                    ty.name()
                )));
            }
            Some(param) if !param.required => {
                return Err(invalid(format!(
                    "parameter {name:?} must be required: path variables are always bound"
                )));
            }
            Some(_) => {}
        }
    }

    if let Some(extra) = params
        .iter()
        .find(|p| pattern.variables().all(|(name, _)| name != p.name))
    {
        return Err(invalid(format!(
            "parameter {:?} has no variable slot to bind from",
            extra.name
        )));
    }

    Ok(())
}
