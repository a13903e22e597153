//! Provisioning error types.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while provisioning control-plane resources.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The control plane answered with a non-success status.
    #[error("HTTP {status} from control plane: {message}")]
    Http { status: u16, message: String },

    /// A response body could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A long-running operation finished with an error status.
    #[error("operation {name} failed with code {code}: {message}")]
    OperationFailed {
        name: String,
        code: i32,
        message: String,
    },

    /// A long-running operation had not finished when polled.
    #[error("operation {name} is still running")]
    OperationPending { name: String },

    /// A long-running operation outlived the configured deadline.
    #[error("operation {name} did not finish within {waited:?}")]
    Timeout { name: String, waited: Duration },

    /// A finished operation did not yield the resource it was creating.
    #[error("operation {name} finished without returning the {kind}")]
    MissingResource { name: String, kind: &'static str },

    /// An existing resource does not match what was requested.
    #[error("{kind} {display_name:?} exists but {detail}")]
    Mismatch {
        kind: &'static str,
        display_name: String,
        detail: String,
    },

    /// A resource the caller expected to exist was not found by display name.
    #[error("no {kind} named {display_name:?}")]
    NotFound {
        kind: &'static str,
        display_name: String,
    },

    /// A request argument was rejected before contacting the control plane.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error propagated from the core model layer.
    #[error(transparent)]
    Core(#[from] anchorage_core::Error),
}

impl ProvisionError {
    /// Returns `true` when the control plane reported the resource missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. } | Self::NotFound { .. })
    }

    /// Build an [`ProvisionError::Http`] from a status code and raw body.
    ///
    /// Google APIs wrap errors as `{"error": {"code", "message", "status"}}`;
    /// anything else is reported verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ErrorBody,
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            message: String,
            #[serde(default)]
            status: Option<String>,
        }

        let message = match serde_json::from_str::<Envelope>(body) {
            Ok(Envelope {
                error:
                    ErrorBody {
                        message,
                        status: Some(code),
                    },
            }) => format!("{code}: {message}"),
            Ok(envelope) => envelope.error.message,
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.trim().to_string(),
        };

        Self::Http { status, message }
    }
}

/// Convenience alias for provisioning results.
pub type ProvisionResult<T> = std::result::Result<T, ProvisionError>;
