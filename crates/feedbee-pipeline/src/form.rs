//! 피드백 폼 상태.
//!
//! 평점/코멘트/이메일/스크린샷 입력을 보관하고 오케스트레이터로 제출한 뒤
//! 결과를 사용자 메시지 하나로 변환한다. 메시지는 항상 하나만 유지한다.

use feedbee_core::config::WidgetConfig;
use feedbee_core::error::CoreError;
use feedbee_core::messages::{GENERIC_ERROR, MAX_SCREENSHOTS, THANK_YOU};
use feedbee_core::models::feedback::{
    FeedbackData, FeedbackRating, FeedbackSubmission, ScreenshotRef,
};
use feedbee_core::models::metadata::{clean_page_title, FeedbackMetadata};
use feedbee_core::ports::api_client::{FeedbackApi, ScreenshotUpload};
use feedbee_core::ports::clock::Clock;
use feedbee_core::ports::storage::KeyValueStore;
use feedbee_core::validation::{sanitize_input, validate_screenshot_file};
use std::sync::Arc;
use tracing::{debug, info};

use crate::orchestrator::SubmissionOrchestrator;
use crate::preferences::EmailPreference;
use crate::rate_limiter::RateLimiter;

/// 메시지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// 폼 하단에 표시하는 결과 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl SubmitMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    /// 마크업 삽입용 HTML 조각 (텍스트는 이스케이프)
    pub fn to_html(&self) -> String {
        let class = match self.kind {
            MessageKind::Success => "fb-msg fb-msg--ok",
            MessageKind::Error => "fb-msg fb-msg--err",
        };
        format!(
            r#"<div class="{class}" role="status">{}</div>"#,
            sanitize_input(&self.text)
        )
    }
}

/// 제출 시점의 페이지 정보 (호출자가 제공)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub title: String,
    pub referrer: Option<String>,
}

/// 키 입력
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    /// macOS Cmd
    pub meta: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    fn is_submit_shortcut(&self) -> bool {
        self.key == Key::Enter && (self.ctrl || self.meta)
    }
}

/// 키 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum KeyHandling {
    /// 폼이 소비함 (제출 단축키)
    Handled(FormOutcome),
    /// 컨테이너가 처리하도록 넘김 (Escape 포함)
    Ignored,
}

/// 제출 결과
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// 성공: 위젯 콜백에 넘길 데이터
    Submitted(FeedbackData),
    /// 실패: 표시된 에러 문구
    Failed(String),
    /// `can_submit`이 거짓이라 시도하지 않음
    NotAllowed,
    /// 새 제출에 밀려 취소됨 (메시지 변경 없음)
    Superseded,
}

/// 피드백 폼
pub struct FeedbackForm {
    config: WidgetConfig,
    api: Arc<dyn FeedbackApi>,
    orchestrator: SubmissionOrchestrator,
    email_preference: EmailPreference,
    clock: Arc<dyn Clock>,

    rating: Option<FeedbackRating>,
    comment: String,
    share_email: bool,
    email: String,
    screenshots: Vec<ScreenshotRef>,
    message: Option<SubmitMessage>,
}

impl FeedbackForm {
    /// 폼 생성 (rate limiter/오케스트레이터/이메일 저장소 구성 포함)
    pub fn new(
        config: WidgetConfig,
        api: Arc<dyn FeedbackApi>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(store.clone(), clock.clone());
        let orchestrator =
            SubmissionOrchestrator::new(api.clone(), rate_limiter, config.rate_limit);
        let email_preference = EmailPreference::new(store);
        let email = email_preference.load();

        Self {
            config,
            api,
            orchestrator,
            email_preference,
            clock,
            rating: None,
            comment: String::new(),
            share_email: false,
            email,
            screenshots: Vec::new(),
            message: None,
        }
    }

    /// 폼 열기: 입력 초기화, 기억된 이메일 채우기
    pub fn open(&mut self) {
        self.rating = None;
        self.comment.clear();
        self.share_email = false;
        self.email = self.email_preference.load();
        self.screenshots.clear();
        self.message = None;
        debug!("피드백 폼 열림");
    }

    /// 폼 닫기: 진행 중인 제출 취소
    ///
    /// 진행 중인 `submit` future를 drop해도 같은 효과이며 제출 상태도 함께 풀린다.
    pub fn close(&self) {
        self.orchestrator.cancel();
        debug!("피드백 폼 닫힘");
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &SubmissionOrchestrator {
        &self.orchestrator
    }

    pub fn rating(&self) -> Option<FeedbackRating> {
        self.rating
    }

    pub fn set_rating(&mut self, rating: Option<FeedbackRating>) {
        self.rating = rating;
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn share_email(&self) -> bool {
        self.share_email
    }

    pub fn set_share_email(&mut self, share: bool) {
        self.share_email = share;
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn screenshots(&self) -> &[ScreenshotRef] {
        &self.screenshots
    }

    /// 오케스트레이터의 진행 상태를 그대로 따른다
    pub fn is_submitting(&self) -> bool {
        self.orchestrator.is_loading()
    }

    pub fn message(&self) -> Option<&SubmitMessage> {
        self.message.as_ref()
    }

    /// 평점이 선택되어 있고 제출 중이 아닐 때만 참
    pub fn can_submit(&self) -> bool {
        self.rating.is_some() && !self.is_submitting()
    }

    /// 스크린샷 업로드 후 목록에 추가
    pub async fn add_screenshot(&mut self, upload: ScreenshotUpload) -> Result<(), CoreError> {
        if self.screenshots.len() >= MAX_SCREENSHOTS {
            return Err(CoreError::Validation(vec![format!("Max {MAX_SCREENSHOTS}")]));
        }
        validate_screenshot_file(&upload.mime_type, upload.bytes.len() as u64).into_result()?;

        let screenshot = self
            .api
            .upload_screenshot(&self.config.client_id, upload)
            .await?;
        debug!("스크린샷 추가: {}", screenshot.file_name);
        self.screenshots.push(screenshot);
        Ok(())
    }

    /// 인덱스로 스크린샷 제거
    pub fn remove_screenshot(&mut self, index: usize) -> Option<ScreenshotRef> {
        (index < self.screenshots.len()).then(|| self.screenshots.remove(index))
    }

    /// 현재 입력으로 폼 데이터 구성
    ///
    /// 이메일 공유가 켜져 있어도 이메일이 비어 있으면 공유하지 않는 것으로 본다.
    fn build_data(&self, rating: FeedbackRating, page: &PageContext) -> FeedbackData {
        let comment = self.comment.trim();
        let email = self.email.trim();
        let share_email = self.share_email && !email.is_empty();

        FeedbackData {
            rating,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
            share_email,
            user_email: share_email.then(|| email.to_string()),
            screenshots: (!self.screenshots.is_empty()).then(|| self.screenshots.clone()),
            metadata: FeedbackMetadata::capture(
                &page.url,
                &clean_page_title(&page.title),
                page.referrer.as_deref(),
                self.clock.as_ref(),
            ),
        }
    }

    /// 제출
    pub async fn submit(&mut self, page: &PageContext) -> FormOutcome {
        let Some(rating) = self.rating.filter(|_| self.can_submit()) else {
            return FormOutcome::NotAllowed;
        };

        self.message = None;

        let data = self.build_data(rating, page);
        let submission = FeedbackSubmission::from_data(
            &self.config.client_id,
            self.config.environment.as_deref(),
            &data,
        );

        let response = self.orchestrator.submit(&submission).await;

        if response.success {
            if let Some(email) = data.user_email.as_deref() {
                self.email_preference.save(email);
            }
            info!("피드백 제출 완료: rating={}", rating.value());
            self.message = Some(SubmitMessage::success(THANK_YOU));
            return FormOutcome::Submitted(data);
        }

        if response.is_cancelled() {
            debug!("제출이 대체됨");
            return FormOutcome::Superseded;
        }

        let text = response
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
        self.message = Some(SubmitMessage::error(text.clone()));
        FormOutcome::Failed(text)
    }

    /// 키 입력 처리
    ///
    /// Ctrl/Cmd+Enter만 소비한다. Escape 등 나머지는 컨테이너로 넘긴다.
    pub async fn handle_key(&mut self, input: KeyInput, page: &PageContext) -> KeyHandling {
        if input.is_submit_shortcut() && self.can_submit() {
            KeyHandling::Handled(self.submit(page).await)
        } else {
            KeyHandling::Ignored
        }
    }

    /// 성공 후 위젯을 닫아야 하는지
    pub fn should_close_after(&self, outcome: &FormOutcome) -> bool {
        self.config.auto_close && matches!(outcome, FormOutcome::Submitted(_))
    }
}
