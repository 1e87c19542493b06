//! Wire types for the long-running-operation endpoints.

use serde::Deserialize;
use vidgen_core::generation::{OperationError, OperationStatus};

/// Body of a `predictLongRunning` response.
#[derive(Debug, Deserialize)]
pub struct StartResponse {
    /// Operation name, e.g. `models/veo-3.0-generate-001/operations/abc123`.
    pub name: Option<String>,
}

/// An operation resource as returned by `GET {base}/{name}`.
#[derive(Debug, Default, Deserialize)]
pub struct Operation {
    pub name: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub response: Option<OperationResponse>,
    pub error: Option<OperationErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedSample {
    pub video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
pub struct VideoRef {
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OperationErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl Operation {
    /// URI of the first generated sample, if the operation produced one.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
    }
}

impl From<Operation> for OperationStatus {
    fn from(op: Operation) -> Self {
        let result_uri = op.video_uri().map(str::to_string);
        Self {
            done: op.done,
            result_uri,
            error: op.error.map(|e| OperationError {
                code: e.code,
                message: e.message,
            }),
        }
    }
}
