//! 피드백 API 클라이언트 포트.
//!
//! 구현: `feedbee-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::feedback::{FeedbackSubmission, ScreenshotRef};
use crate::models::response::SubmissionResponse;

/// 업로드할 스크린샷 파일
#[derive(Debug, Clone)]
pub struct ScreenshotUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// 피드백 서버 클라이언트
///
/// 네트워크 I/O를 수행하는 유일한 컴포넌트.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// 피드백 제출
    ///
    /// 전송 에러를 포함한 모든 실패를 `success: false` 결과로 돌려주며
    /// 절대 에러를 던지지 않는다.
    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> SubmissionResponse;

    /// 서버 헬스 체크 (실패는 모두 `false`)
    async fn health_check(&self) -> bool;

    /// 스크린샷 업로드
    async fn upload_screenshot(
        &self,
        client_id: &str,
        upload: ScreenshotUpload,
    ) -> Result<ScreenshotRef, CoreError>;
}
