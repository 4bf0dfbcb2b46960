use reqwest::StatusCode;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::resources::{
    id::{ResourceId, ResourceRef},
    Resource,
};

/// Why a request could not be classified. Every fault is reported to the caller as a 500.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// The server answered with a status the operation does not expect.
    UnexpectedStatus(StatusCode),
    Connection,
    Timeout,
    MalformedResponse,
    /// Any other failure to build or send the request.
    Request,
}

impl Fault {
    /// Short tag used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Fault::UnexpectedStatus(_) => "status",
            Fault::Connection => "connection",
            Fault::Timeout => "timeout",
            Fault::MalformedResponse => "decode",
            Fault::Request => "request",
        }
    }

    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Fault::Timeout
        } else if error.is_connect() {
            Fault::Connection
        } else if error.is_decode() {
            Fault::MalformedResponse
        } else {
            Fault::Request
        }
    }
}

impl Display for Fault {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Fault::UnexpectedStatus(status) => {
                write!(formatter, "Unexpected error ({})", status.as_u16())
            }
            Fault::Connection => write!(formatter, "Connection error"),
            Fault::Timeout => write!(formatter, "Request timed out"),
            Fault::MalformedResponse => write!(formatter, "Malformed response"),
            Fault::Request => write!(formatter, "Ambiguous exception occurred"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Failure {
    /// A client error the API documents, with its JSON error body.
    #[error("API request failed with {}: {}", status_code, error)]
    Api { status_code: StatusCode, error: Value },

    /// Anything else: transport faults and unexpected statuses.
    #[error("{} ({})", message, fault)]
    Internal {
        fault: Fault,
        message: &'static str,
    },
}

impl Failure {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Failure::Api { status_code, .. } => *status_code,
            Failure::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error payload: the server's body, or a generic one for internal failures.
    pub fn error(&self) -> Value {
        match self {
            Failure::Api { error, .. } => error.clone(),
            Failure::Internal { message, .. } => json!({
                "status": {
                    "code": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    "message": message,
                }
            }),
        }
    }

    pub fn fault(&self) -> Option<Fault> {
        match self {
            Failure::Api { .. } => None,
            Failure::Internal { fault, .. } => Some(*fault),
        }
    }

    /// Human readable message, taken from `status.message` when the server provides one.
    pub fn message(&self) -> String {
        match self {
            Failure::Api { error, .. } => error
                .pointer("/status/message")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), str::to_owned),
            Failure::Internal { message, .. } => (*message).to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub status_code: StatusCode,
    pub location: Option<String>,
    pub object: T,
}

/// Outcome of a single API call.
///
/// A failed call never carries an object, so an identifier can only be taken from a successful
/// envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(Success<T>),
    Failure(Failure),
}

impl<T> Envelope<T> {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Envelope::Success(success) => success.status_code,
            Envelope::Failure(failure) => failure.status_code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn object(&self) -> Option<&T> {
        match self {
            Envelope::Success(success) => Some(&success.object),
            Envelope::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(failure) => Some(failure),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Envelope::Success(success) => success.location.as_deref(),
            Envelope::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Envelope::Success(success) => Ok(success.object),
            Envelope::Failure(failure) => Err(failure),
        }
    }

    pub fn map<U>(self, map: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Success(Success {
                status_code,
                location,
                object,
            }) => Envelope::Success(Success {
                status_code,
                location,
                object: map(object),
            }),
            Envelope::Failure(failure) => Envelope::Failure(failure),
        }
    }
}

impl Envelope<Resource> {
    pub fn resource_id(&self) -> Option<&ResourceId> {
        self.object().map(|resource| &resource.resource)
    }
}

impl ResourceRef for Envelope<Resource> {
    fn resource_ref(&self) -> Option<&str> {
        self.resource_id().map(ResourceId::as_str)
    }
}
