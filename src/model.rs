// The model module turns raw operations into normalized endpoint records.

pub mod endpoint;
pub mod naming;

pub use endpoint::{
    build_endpoint,
    build_endpoints,
    collection_path,
    normalize_json,
    placeholders,
    resource_segment,
    Endpoint,
    Verb,
};
pub use naming::{derive_names, DerivedNames};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unsupported HTTP method {method} for operation \"{operation_id}\"")]
    UnsupportedMethod { method: String, operation_id: String },

    #[error("Operation id \"{0}\" has no letters to derive names from")]
    EmptyOperationId(String),

    #[error("Operation id \"{operation_id}\" carries no resource token for a {verb} endpoint")]
    MissingResourceToken { operation_id: String, verb: Verb },

    #[error("No resource segment in \"{0}\"")]
    MissingResourceSegment(String),
}
