//! Error types shared across the routing tree.

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Errors produced while routing a request through a node.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// The destination, or a node below it, failed to produce a reply.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// The node had no destination able to serve the request.
    #[error("no destination for request")]
    NoDestination,
}

impl RouteError {
    /// Shorthand for an upstream failure with a display-formatted cause.
    pub fn upstream(cause: impl std::fmt::Display) -> Self {
        RouteError::Upstream(cause.to_string())
    }
}

/// Errors produced while building route nodes from a configuration document.
///
/// Per-destination problems never surface here; they degrade through the
/// invalid-config diagnostics channel instead. Only a document that cannot
/// be used at all is an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be deserialized into the expected schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document deserialized but failed semantic validation.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A referenced child node could not be materialized by the provider.
    #[error("provider error: {0}")]
    Provider(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
