//! 테스트용 `FeedbackApi` mock.

use async_trait::async_trait;
use feedbee_core::error::CoreError;
use feedbee_core::models::feedback::{FeedbackSubmission, ScreenshotRef};
use feedbee_core::models::response::SubmissionResponse;
use feedbee_core::ports::api_client::{FeedbackApi, ScreenshotUpload};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// 호출을 기록하고 미리 정한 응답을 돌려주는 mock
///
/// `hold_first`가 켜져 있으면 첫 호출은 `release()` 전까지 대기한다.
pub(crate) struct MockApi {
    pub calls: AtomicUsize,
    pub submissions: Mutex<Vec<FeedbackSubmission>>,
    pub response: Mutex<SubmissionResponse>,
    pub started: Notify,
    hold_first: bool,
    release: Notify,
}

impl MockApi {
    pub fn responding(response: SubmissionResponse) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            response: Mutex::new(response),
            started: Notify::new(),
            hold_first: false,
            release: Notify::new(),
        }
    }

    pub fn ok() -> Self {
        Self::responding(SubmissionResponse::succeeded(
            serde_json::json!({ "success": true }),
            "Feedback submitted successfully".to_string(),
            None,
        ))
    }

    pub fn holding_first() -> Self {
        Self {
            hold_first: true,
            ..Self::ok()
        }
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackApi for MockApi {
    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> SubmissionResponse {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.submissions.lock().push(submission.clone());
        self.started.notify_one();

        if self.hold_first && index == 0 {
            self.release.notified().await;
        }
        self.response.lock().clone()
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn upload_screenshot(
        &self,
        _client_id: &str,
        upload: ScreenshotUpload,
    ) -> Result<ScreenshotRef, CoreError> {
        Ok(ScreenshotRef {
            url: format!("https://cdn.example.com/{}", upload.file_name),
            file_size: upload.bytes.len() as u64,
            file_name: upload.file_name,
            width: None,
            height: None,
            mime_type: upload.mime_type,
        })
    }
}
