//! Introspection service: machine-readable listings of everything the
//! registry holds, for client discovery.
//!
//! Pure read over the registry. Ordering equals registration order, and
//! the listings reflect declared parameter types and required flags
//! faithfully; this is what a remote caller relies on to construct
//! valid requests without trial and error.

use serde::Serialize;

use crate::registry::{CapabilityKind, ParamSpec, Registry};

/// One listed capability: its identifier pattern, parameter spec, and
/// description.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityInfo {
    pub identifier: String,
    pub params: Vec<ParamSpec>,
    pub description: String,
    /// True when the identifier contains variable slots.
    pub templated: bool,
}

/// List registered capabilities of one kind, in registration order.
pub fn list_capabilities(registry: &Registry, kind: CapabilityKind) -> Vec<CapabilityInfo> {
    registry
        .list(kind)
        .iter()
        .map(|record| CapabilityInfo {
            identifier: record.pattern.raw().to_string(),
            params: record.params.clone(),
            description: record.description.clone(),
            templated: !record.pattern.is_literal(),
        })
        .collect()
}
