//! # Resource Errors
//!
//! This module defines the error type shared by every part of the resource core.
//! Configuration mistakes, failed model inference, missing instances and adapter
//! failures all surface as a [`ResourceError`], so hosts match on one enum no
//! matter which layer produced the failure.
//!
//! Nothing in the core catches or retries these errors. They propagate to the
//! caller unchanged.

use crate::overrides::Operation;

/// Errors that can occur within the resource core.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The resource definition is invalid. Raised once, at the end of the builder pass.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model inference from the resource name failed.
    #[error(
        "Unable to find model `{model}` for resource `{resource}`. \
         Specify a different model using `ResourceBuilder::model(\"MyModel\")`"
    )]
    ModelNotFound { model: String, resource: String },

    /// `find_instance` resolved to nothing.
    #[error("Instance not found: {resource}/{id}")]
    InstanceNotFound { resource: String, id: String },

    /// An adapter operation (or its override) failed.
    #[error("Adapter error in `{operation}`: {source}")]
    Adapter {
        operation: Operation,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Resource already registered: {0}")]
    DuplicateResource(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// The registered resource exists but uses a different adapter type.
    #[error("Resource `{0}` is not backed by the requested adapter type")]
    ResourceType(String),
}

impl ResourceError {
    /// Wraps an adapter or override failure, tagging it with the operation that produced it.
    pub fn adapter<E>(operation: Operation, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ResourceError::Adapter {
            operation,
            source: Box::new(error),
        }
    }

    /// The operation that failed, for adapter errors.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ResourceError::Adapter { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ResourceError> = std::result::Result<T, E>;
