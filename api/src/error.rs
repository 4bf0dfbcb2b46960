use reqwest::StatusCode;
use std::path::PathBuf;
use url::Url;

use crate::resources::id::{ResourceId, ResourceKind};

pub type Result<T> = std::result::Result<T, Error>;

/// Failures detected on the client side, before or instead of talking to the API.
///
/// Outcomes reported by the server are never turned into an `Error`; they are returned as an
/// [`Envelope`](crate::Envelope).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Expected a {} id, got: `{}`", expected, identifier)]
    InvalidIdentifier {
        identifier: String,
        expected: &'static str,
    },

    #[error("No {} id is available, the resource was never created", expected)]
    MissingIdentifier { expected: &'static str },

    #[error("Unknown resource kind `{}`", kind)]
    BadResourceKind { kind: String },

    #[error("Input field `{}` does not match any field of the model", name)]
    FieldTranslationMiss { name: String },

    #[error("Could not retrieve the fields of `{}`", resource)]
    FieldsUnavailable { resource: ResourceId },

    #[error("Resources of kind `{}` have no fields", kind)]
    FieldsUnsupported { kind: ResourceKind },

    #[error("API request failed with {}: {}", status_code, message)]
    NotCreated {
        status_code: StatusCode,
        message: String,
    },

    #[error("Invalid endpoint `{}`", endpoint)]
    BadEndpoint { endpoint: Url },

    #[error("Failed to initialise the HTTP client")]
    BuildHttpClient(#[source] reqwest::Error),

    #[error("Could not read source file `{}`", path.display())]
    ReadSourceFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not serialise request body")]
    SerializeRequest(#[source] serde_json::Error),
}
