//! Error types.
//!
//! Timing glitches and step exhaustion are not errors; the loop absorbs them.
//! Only resource failures and bad configuration surface as values here.

use thiserror::Error;

use crate::types::{BodyHandle, RenderHandle};

/// Failure reported by the physics or render service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("physics body creation failed: {0}")]
    BodyCreation(String),
    #[error("render primitive creation failed: {0}")]
    PrimitiveCreation(String),
    #[error("unknown physics body {0}")]
    UnknownBody(BodyHandle),
    #[error("unknown render primitive {0}")]
    UnknownPrimitive(RenderHandle),
    #[error("frame presentation failed: {0}")]
    Present(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// A body or primitive could not be allocated. Nothing half-built is retained.
    #[error("entity creation failed")]
    ResourceCreation(#[source] ServiceError),
    #[error("transform sync failed")]
    Sync(#[source] ServiceError),
    #[error("render failed")]
    Render(#[source] ServiceError),
    #[error("resource release failed")]
    Release(#[source] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
