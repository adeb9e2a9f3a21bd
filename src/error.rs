use thiserror::Error;

/// Errors surfaced by cache construction, registration and sharding.
///
/// These are configuration errors: they are returned synchronously at
/// construction or registration time and never silently corrected. Missing
/// keys, missing shard nodes and missing registry entries are not errors;
/// those are reported as `Option`/`bool` results.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid capacity for cache `{name}`: capacity must be positive")]
    InvalidCapacity { name: String },

    #[error("cache `{name}` is already registered")]
    AlreadyRegistered { name: String },

    #[error("empty node list for sharded cache")]
    EmptyNodes,

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CacheError {
    pub fn invalid_capacity(name: impl Into<String>) -> Self {
        Self::InvalidCapacity { name: name.into() }
    }

    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered { name: name.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
