//! In-memory doubles for the lifecycle seams.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::generation::{GeneratorError, OperationStatus, StartedOperation, VideoGenerator};
use crate::status::VideoStatus;
use crate::types::{DbId, Timestamp};

use super::store::{PollCandidate, StoreError, VideoStore};

#[derive(Debug, Clone)]
pub struct StoredVideo {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub prompt: String,
    pub status: VideoStatus,
    pub operation_handle: Option<String>,
    pub result_uri: Option<String>,
    pub error_detail: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

#[derive(Default)]
struct Failures {
    create: bool,
    mark_processing: bool,
    terminal: bool,
}

/// Job store backed by a `Vec`, with switchable write failures.
#[derive(Default)]
pub struct MemoryStore {
    videos: Mutex<Vec<StoredVideo>>,
    failures: Mutex<Failures>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.videos.lock().unwrap().len()
    }

    pub fn get(&self, id: DbId) -> Option<StoredVideo> {
        self.videos
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    pub fn snapshot(&self) -> Vec<StoredVideo> {
        self.videos.lock().unwrap().clone()
    }

    /// Insert a job already in `processing`, created at `created_at`.
    pub fn insert_processing(&self, user_id: DbId, handle: &str, created_at: Timestamp) -> DbId {
        let mut videos = self.videos.lock().unwrap();
        let id = videos.len() as DbId + 1;
        videos.push(StoredVideo {
            id,
            user_id,
            title: format!("Video {id}"),
            prompt: "prompt".into(),
            status: VideoStatus::Processing,
            operation_handle: Some(handle.to_string()),
            result_uri: None,
            error_detail: None,
            created_at,
            completed_at: None,
        });
        id
    }

    pub fn fail_create(&self) {
        self.failures.lock().unwrap().create = true;
    }

    pub fn fail_mark_processing(&self) {
        self.failures.lock().unwrap().mark_processing = true;
    }

    pub fn fail_terminal_writes(&self) {
        self.failures.lock().unwrap().terminal = true;
    }

    fn finish(
        &self,
        id: DbId,
        status: VideoStatus,
        uri: Option<&str>,
        detail: Option<&str>,
    ) -> Result<bool, StoreError> {
        if self.failures.lock().unwrap().terminal {
            return Err("store unavailable".into());
        }
        let mut videos = self.videos.lock().unwrap();
        match videos
            .iter_mut()
            .find(|v| v.id == id && !v.status.is_terminal())
        {
            Some(video) => {
                video.status = status;
                video.result_uri = uri.map(str::to_string);
                video.error_detail = detail.map(str::to_string);
                video.completed_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn create_generating(
        &self,
        user_id: DbId,
        title: &str,
        prompt: &str,
    ) -> Result<DbId, StoreError> {
        if self.failures.lock().unwrap().create {
            return Err("insert rejected".into());
        }
        let mut videos = self.videos.lock().unwrap();
        let id = videos.len() as DbId + 1;
        videos.push(StoredVideo {
            id,
            user_id,
            title: title.to_string(),
            prompt: prompt.to_string(),
            status: VideoStatus::Generating,
            operation_handle: None,
            result_uri: None,
            error_detail: None,
            created_at: Utc::now(),
            completed_at: None,
        });
        Ok(id)
    }

    async fn mark_processing(
        &self,
        video_id: DbId,
        operation_handle: &str,
    ) -> Result<bool, StoreError> {
        if self.failures.lock().unwrap().mark_processing {
            return Err("update rejected".into());
        }
        let mut videos = self.videos.lock().unwrap();
        match videos
            .iter_mut()
            .find(|v| v.id == video_id && v.status == VideoStatus::Generating)
        {
            Some(video) => {
                video.status = VideoStatus::Processing;
                video.operation_handle = Some(operation_handle.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_completed(&self, video_id: DbId, result_uri: &str) -> Result<bool, StoreError> {
        self.finish(video_id, VideoStatus::Completed, Some(result_uri), None)
    }

    async fn mark_failed(&self, video_id: DbId, error_detail: &str) -> Result<bool, StoreError> {
        self.finish(video_id, VideoStatus::Failed, None, Some(error_detail))
    }

    async fn list_pollable(
        &self,
        created_after: Timestamp,
    ) -> Result<Vec<PollCandidate>, StoreError> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.status == VideoStatus::Processing && v.created_at >= created_after)
            .filter_map(|v| {
                v.operation_handle.as_ref().map(|handle| PollCandidate {
                    video_id: v.id,
                    user_id: v.user_id,
                    title: v.title.clone(),
                    operation_handle: handle.clone(),
                })
            })
            .collect())
    }
}

/// Generator returning scripted responses.
///
/// `start` answers with the configured response (a transport error when
/// none is set); `check` answers per handle (a transport error for unknown
/// handles).
#[derive(Default)]
pub struct ScriptedGenerator {
    start_response: Mutex<Option<Result<StartedOperation, GeneratorError>>>,
    check_responses: Mutex<HashMap<String, Result<OperationStatus, GeneratorError>>>,
    started_prompts: Mutex<Vec<String>>,
    checked_handles: Mutex<Vec<String>>,
    observed: Option<Arc<MemoryStore>>,
    store_at_start: Mutex<Vec<StoredVideo>>,
}

impl ScriptedGenerator {
    /// A generator that snapshots `store` whenever `start` is called.
    pub fn observing(store: Arc<MemoryStore>) -> Self {
        Self {
            observed: Some(store),
            ..Self::default()
        }
    }

    pub fn start_returns(&self, response: Result<StartedOperation, GeneratorError>) {
        *self.start_response.lock().unwrap() = Some(response);
    }

    pub fn start_with_handle(&self, handle: &str) {
        self.start_returns(Ok(StartedOperation {
            operation_handle: Some(handle.to_string()),
        }));
    }

    pub fn check_returns(&self, handle: &str, response: Result<OperationStatus, GeneratorError>) {
        self.check_responses
            .lock()
            .unwrap()
            .insert(handle.to_string(), response);
    }

    pub fn started_prompts(&self) -> Vec<String> {
        self.started_prompts.lock().unwrap().clone()
    }

    pub fn checked_handles(&self) -> Vec<String> {
        self.checked_handles.lock().unwrap().clone()
    }

    pub fn store_at_start(&self) -> Vec<StoredVideo> {
        self.store_at_start.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoGenerator for ScriptedGenerator {
    async fn start(&self, prompt: &str) -> Result<StartedOperation, GeneratorError> {
        if let Some(store) = &self.observed {
            *self.store_at_start.lock().unwrap() = store.snapshot();
        }
        self.started_prompts.lock().unwrap().push(prompt.to_string());
        self.start_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(GeneratorError::Transport("no scripted response".into())))
    }

    async fn check(&self, handle: &str) -> Result<OperationStatus, GeneratorError> {
        self.checked_handles.lock().unwrap().push(handle.to_string());
        self.check_responses
            .lock()
            .unwrap()
            .get(handle)
            .cloned()
            .unwrap_or_else(|| Err(GeneratorError::Transport("connection reset".into())))
    }
}
