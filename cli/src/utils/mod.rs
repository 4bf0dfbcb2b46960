pub mod io;

use anyhow::{anyhow, Context, Result};
use bigml_client::{Envelope, Failure};
use serde_json::{Map, Value};

pub use self::io::{
    complete_credentials, init_env_logger, read_from_stdin, read_optional_from_stdin,
};

/// Parse a JSON object given on the command line.
pub fn parse_json_object(string: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(string).context("Invalid JSON")? {
        Value::Object(object) => Ok(object),
        other => Err(anyhow!("Expected a JSON object, got `{}`", other)),
    }
}

/// Parse a `key=value` property. The value is read as JSON when possible and as a plain string
/// otherwise, so `size=1024` is a number and `name=iris` a string.
pub fn parse_property(string: &str) -> Result<(String, Value)> {
    let (key, value) = string
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected `key=value`, got `{}`", string))?;
    if key.is_empty() {
        return Err(anyhow!("Property name cannot be empty in `{}`", string));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

/// Take the object out of an envelope, turning a failure into an error with the server message.
pub fn into_object<T>(envelope: Envelope<T>) -> Result<T> {
    envelope.into_result().map_err(|failure| match &failure {
        Failure::Api { status_code, .. } => anyhow!(
            "API responded with {}: {}",
            status_code,
            failure.message()
        ),
        Failure::Internal { fault, .. } => {
            anyhow!("{} ({}): {}", failure.message(), failure.status_code(), fault)
        }
    })
}

/// Like [`into_object`], for calls that can also fail before reaching the API.
pub fn object_from<T>(result: bigml_client::Result<Envelope<T>>) -> Result<T> {
    into_object(result?)
}
