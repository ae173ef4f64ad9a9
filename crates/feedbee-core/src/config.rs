//! 위젯 설정 구조체.
//!
//! `WidgetOptions`는 모든 필드가 선택적인 입력(설정 파일/CLI),
//! `WidgetConfig`는 기본값 적용 후 확정된 설정이다.
//! 병합은 `WidgetConfig::from_options` 한 곳에서만 한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::messages::{DEFAULT_API_URL, DEFAULT_PLACEHOLDER, DEFAULT_TITLE, INVALID_CLIENT_ID};
use crate::validation::validate_client_id;

// ============================================================
// Rate limit 정책
// ============================================================

/// 슬라이딩 윈도우 rate limit 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitPolicy {
    /// 윈도우 내 최대 제출 수
    #[serde(default = "default_max_submissions")]
    pub max_submissions: usize,
    /// 윈도우 길이 (밀리초)
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_ms: default_window_ms(),
        }
    }
}

fn default_max_submissions() -> usize {
    5
}

fn default_window_ms() -> i64 {
    60_000
}

// ============================================================
// 입력 옵션
// ============================================================

/// 위젯 옵션 (설정 파일의 camelCase JSON과 1:1 대응)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_email_option: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_screenshot_option: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitPolicy>,
}

impl WidgetOptions {
    /// `other`에 설정된 값으로 덮어쓰기 (CLI > 파일)
    pub fn merge(self, other: WidgetOptions) -> WidgetOptions {
        WidgetOptions {
            client_id: other.client_id.or(self.client_id),
            base_url: other.base_url.or(self.base_url),
            environment: other.environment.or(self.environment),
            title: other.title.or(self.title),
            placeholder: other.placeholder.or(self.placeholder),
            show_email_option: other.show_email_option.or(self.show_email_option),
            show_screenshot_option: other.show_screenshot_option.or(self.show_screenshot_option),
            auto_close: other.auto_close.or(self.auto_close),
            debug: other.debug.or(self.debug),
            retry_attempts: other.retry_attempts.or(self.retry_attempts),
            retry_delay_ms: other.retry_delay_ms.or(self.retry_delay_ms),
            submit_timeout_ms: other.submit_timeout_ms.or(self.submit_timeout_ms),
            health_timeout_ms: other.health_timeout_ms.or(self.health_timeout_ms),
            rate_limit: other.rate_limit.or(self.rate_limit),
        }
    }
}

// ============================================================
// 확정 설정
// ============================================================

/// 확정된 위젯 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub client_id: String,
    pub base_url: String,
    pub environment: Option<String>,
    pub title: String,
    pub placeholder: String,
    pub show_email_option: bool,
    pub show_screenshot_option: bool,
    /// 제출 성공 시 패널 자동 닫기
    pub auto_close: bool,
    pub debug: bool,
    /// 제출 최대 시도 횟수
    pub retry_attempts: u32,
    /// 선형 백오프 단위 (시도 번호를 곱함)
    pub retry_delay_ms: u64,
    pub submit_timeout_ms: u64,
    pub health_timeout_ms: u64,
    pub rate_limit: RateLimitPolicy,
}

impl WidgetConfig {
    /// 기본값 적용 후 옵션으로 덮어쓰고 client ID를 검증
    pub fn from_options(options: WidgetOptions) -> Result<Self, CoreError> {
        let config = Self::from_options_unchecked(options);
        config.validate()?;
        Ok(config)
    }

    /// 검증 없이 기본값과 옵션만 병합 (client ID가 필요 없는 헬스 체크용)
    pub fn from_options_unchecked(options: WidgetOptions) -> Self {
        let defaults = Self::defaults(options.client_id.unwrap_or_default());

        Self {
            client_id: defaults.client_id,
            base_url: options.base_url.unwrap_or(defaults.base_url),
            environment: options.environment.or(defaults.environment),
            title: options.title.unwrap_or(defaults.title),
            placeholder: options.placeholder.unwrap_or(defaults.placeholder),
            show_email_option: options
                .show_email_option
                .unwrap_or(defaults.show_email_option),
            show_screenshot_option: options
                .show_screenshot_option
                .unwrap_or(defaults.show_screenshot_option),
            auto_close: options.auto_close.unwrap_or(defaults.auto_close),
            debug: options.debug.unwrap_or(defaults.debug),
            retry_attempts: options.retry_attempts.unwrap_or(defaults.retry_attempts),
            retry_delay_ms: options.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
            submit_timeout_ms: options
                .submit_timeout_ms
                .unwrap_or(defaults.submit_timeout_ms),
            health_timeout_ms: options
                .health_timeout_ms
                .unwrap_or(defaults.health_timeout_ms),
            rate_limit: options.rate_limit.unwrap_or(defaults.rate_limit),
        }
    }

    /// 기본 설정
    pub fn defaults(client_id: String) -> Self {
        Self {
            client_id,
            base_url: DEFAULT_API_URL.to_string(),
            environment: None,
            title: DEFAULT_TITLE.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            show_email_option: true,
            show_screenshot_option: true,
            auto_close: true,
            debug: false,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            submit_timeout_ms: 10_000,
            health_timeout_ms: 5_000,
            rate_limit: RateLimitPolicy::default(),
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        let client_check = validate_client_id(&self.client_id);
        if !client_check.is_valid {
            tracing::warn!("{}", client_check.errors.join(", "));
            return Err(CoreError::Config(format!(
                "{INVALID_CLIENT_ID} ({})",
                client_check.errors.join(", ")
            )));
        }
        if self.retry_attempts == 0 {
            return Err(CoreError::Config(
                "retryAttempts must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.max_submissions == 0 || self.rate_limit.window_ms <= 0 {
            return Err(CoreError::Config(
                "rateLimit requires maxSubmissions >= 1 and windowMs > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
