//! Errors raised while synthesizing and registering operation documents.
//!
//! Every error here surfaces at registration time, before any request traffic.

use crate::paths::HttpVerb;

/// Error returned by operation builders and the path manager
#[derive(thiserror::Error, Debug)]
pub enum DocsError {
    /// A caller-supplied parameter or header could not be normalized into a `Parameter`.
    #[error("invalid entry #{index} in `{field}`: {source}")]
    InvalidParameter {
        field: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The route key was already decorated and the duplicate policy is `reject`.
    #[error("operation for {verb} {path} is already registered")]
    DuplicateRoute { verb: HttpVerb, path: String },
}

/// Configuration loading error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load opsynth configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}
