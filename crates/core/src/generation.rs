//! Remote video generator seam.
//!
//! The remote API follows the long-running-operation pattern: `start`
//! returns an opaque operation handle and `check` reports whether that
//! operation is done and what it produced. [`VideoGenerator`] is the trait
//! every generator client implements; the production implementation lives
//! in `vidgen-veo`.

use async_trait::async_trait;

/// Result of a successful `start` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedOperation {
    /// Handle of the remote operation. `None` when the API answered with a
    /// success status but did not include one.
    pub operation_handle: Option<String>,
}

/// Snapshot of a remote operation returned by `check`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationStatus {
    /// Whether the remote operation has finished.
    pub done: bool,
    /// Location of the produced artifact, if any.
    pub result_uri: Option<String>,
    /// Error payload reported by the remote operation, if any.
    pub error: Option<OperationError>,
}

/// Error payload carried by a finished remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl OperationStatus {
    /// A snapshot of an operation that is still running.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A snapshot of an operation that finished with an artifact.
    pub fn succeeded(uri: impl Into<String>) -> Self {
        Self {
            done: true,
            result_uri: Some(uri.into()),
            error: None,
        }
    }

    /// A snapshot of an operation that finished with an error payload.
    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            done: true,
            result_uri: None,
            error: Some(OperationError {
                code: None,
                message: Some(message.into()),
            }),
        }
    }
}

/// Errors from talking to the remote generator.
///
/// All variants describe a failed call, never a failed generation: a
/// generation failure is an [`OperationStatus`] with an error payload.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered 2xx but the body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GeneratorError {
    /// Short, user-facing error detail stored on a failed job.
    ///
    /// Response bodies are left out; they go to the logs instead.
    pub fn job_detail(&self) -> String {
        match self {
            Self::Transport(msg) => format!("Request to video generator failed: {msg}"),
            Self::Api { status, .. } => format!("API Error: HTTP {status}"),
            Self::Decode(msg) => format!("Unreadable video generator response: {msg}"),
        }
    }
}

/// A client for a long-running-operation video generation API.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Begin generating a video for `prompt`.
    async fn start(&self, prompt: &str) -> Result<StartedOperation, GeneratorError>;

    /// Fetch the current state of the operation identified by `handle`.
    async fn check(&self, handle: &str) -> Result<OperationStatus, GeneratorError>;
}
