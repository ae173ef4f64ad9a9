//! HTTP 피드백 API 클라이언트.
//!
//! `FeedbackApi` 포트 구현. 시도별 타임아웃 + 선형 백오프 재시도 + 에러 정규화.
//! 이 모듈 밖으로는 전송 에러가 `SubmissionResponse` 형태로만 나간다.

use async_trait::async_trait;
use feedbee_core::config::WidgetConfig;
use feedbee_core::error::CoreError;
use feedbee_core::messages::{DEFAULT_SUCCESS_MESSAGE, GENERIC_ERROR, NETWORK_ERROR, UPLOAD_FAILED};
use feedbee_core::models::feedback::{FeedbackSubmission, ScreenshotRef};
use feedbee_core::models::response::SubmissionResponse;
use feedbee_core::ports::api_client::{FeedbackApi, ScreenshotUpload};
use feedbee_core::validation::validate_screenshot_file;
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// 기본 시도 횟수
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// 기본 백오프 단위
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// 제출 시도당 타임아웃
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// 헬스 체크 타임아웃
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// 스크린샷 업로드 응답
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    screenshot: Option<ScreenshotRef>,
}

/// 끝의 슬래시 하나만 제거
fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// 피드백 REST 클라이언트: `FeedbackApi` 포트 구현
pub struct HttpFeedbackClient {
    client: reqwest::Client,
    base_url: RwLock<String>,
    retry_attempts: u32,
    retry_delay: Duration,
    submit_timeout: Duration,
    health_timeout: Duration,
}

impl HttpFeedbackClient {
    /// 새 클라이언트 생성 (기본 재시도/타임아웃)
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: RwLock::new(normalize_base_url(base_url)),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    /// 위젯 설정으로 생성
    pub fn from_config(config: &WidgetConfig) -> Result<Self, CoreError> {
        Ok(Self::new(&config.base_url)?
            .with_retry(config.retry_attempts, config.retry_delay())
            .with_timeouts(config.submit_timeout(), config.health_timeout()))
    }

    /// 재시도 정책 설정 (`attempts`는 최소 1)
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    /// 타임아웃 설정
    pub fn with_timeouts(mut self, submit: Duration, health: Duration) -> Self {
        self.submit_timeout = submit;
        self.health_timeout = health;
        self
    }

    /// 현재 서버 주소
    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    /// 서버 주소 변경
    pub fn set_base_url(&self, url: &str) {
        *self.base_url.write() = normalize_base_url(url);
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.read(), path)
    }

    /// 전송 에러 분류
    fn map_transport_error(error: reqwest::Error, timeout: Duration) -> CoreError {
        if error.is_timeout() {
            CoreError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            warn!("전송 실패: {error}");
            CoreError::Network(NETWORK_ERROR.to_string())
        }
    }

    /// 2xx 이외 응답을 에러로 변환
    ///
    /// 본문 JSON의 `error` 필드를 우선하고, 없으면 `HTTP <status>: <reason>`.
    async fn error_from_response(resp: reqwest::Response) -> CoreError {
        let status = resp.status();
        let fallback = format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        );

        let message = match resp.json::<Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or(fallback),
            Err(_) => fallback,
        };

        CoreError::Http {
            status: status.as_u16(),
            message,
        }
    }

    /// 제출 1회 시도
    async fn attempt_submit(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<SubmissionResponse, CoreError> {
        let resp = self
            .client
            .post(self.endpoint("/api/feedback"))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.submit_timeout)
            .json(submission)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(e, self.submit_timeout))?;

        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        let text = resp
            .text()
            .await
            .map_err(|e| Self::map_transport_error(e, self.submit_timeout))?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            warn!("응답 파싱 실패: {e}");
            CoreError::InvalidResponse("Invalid response from server".to_string())
        })?;

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(GENERIC_ERROR)
                .to_string();
            return Err(CoreError::InvalidResponse(message));
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
            .to_string();
        let id = match body.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };

        Ok(SubmissionResponse::succeeded(body, message, id))
    }

    /// 재시도가 포함된 요청 실행
    ///
    /// 선형 backoff: `retry_delay * 시도 번호` (1s → 2s → ...).
    /// 마지막 시도의 에러만 반환하고 이전 에러는 로그로만 남긴다.
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() || attempt >= self.retry_attempts {
                        return Err(e);
                    }

                    let delay = self.retry_delay * attempt;
                    warn!(
                        "요청 실패 (시도 {}/{}): {e}, {delay:?} 후 재시도",
                        attempt, self.retry_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackClient {
    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> SubmissionResponse {
        debug!(
            "피드백 제출: client_id={}, rating={:?}",
            submission.client_id, submission.rating
        );

        match self
            .execute_with_retry(|| self.attempt_submit(submission))
            .await
        {
            Ok(response) => {
                debug!("피드백 제출 성공: id={:?}", response.id);
                response
            }
            Err(e) => {
                warn!("피드백 제출 실패: {e}");
                SubmissionResponse::from_error(&e)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(self.endpoint("/health"))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("헬스 체크 실패: {e}");
                false
            }
        }
    }

    async fn upload_screenshot(
        &self,
        client_id: &str,
        upload: ScreenshotUpload,
    ) -> Result<ScreenshotRef, CoreError> {
        validate_screenshot_file(&upload.mime_type, upload.bytes.len() as u64).into_result()?;

        debug!(
            "스크린샷 업로드: {} ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );

        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| {
                warn!("잘못된 MIME 타입: {e}");
                CoreError::Validation(vec!["Image files only".to_string()])
            })?;
        let form = reqwest::multipart::Form::new()
            .part("screenshot", part)
            .text("clientId", client_id.to_string());

        let resp = self
            .client
            .post(self.endpoint("/api/screenshots"))
            .timeout(self.submit_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("스크린샷 업로드 요청 실패: {e}");
                CoreError::Network(UPLOAD_FAILED.to_string())
            })?;

        if !resp.status().is_success() {
            let err = Self::error_from_response(resp).await;
            warn!("스크린샷 업로드 거부: {err}");
            return Err(CoreError::Network(UPLOAD_FAILED.to_string()));
        }

        match resp.json::<UploadResponse>().await {
            Ok(UploadResponse {
                success: true,
                screenshot: Some(screenshot),
            }) => Ok(screenshot),
            Ok(_) => Err(CoreError::InvalidResponse(UPLOAD_FAILED.to_string())),
            Err(e) => {
                warn!("업로드 응답 파싱 실패: {e}");
                Err(CoreError::InvalidResponse(UPLOAD_FAILED.to_string()))
            }
        }
    }
}
