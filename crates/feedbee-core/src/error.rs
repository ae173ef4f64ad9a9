//! Feedbee 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환한다.
//! 사용자에게 노출되는 메시지는 `Display` 구현(영문)을 그대로 사용한다.

use thiserror::Error;

/// 실패 분류.
///
/// UI 레이어가 에러 종류별로 다르게 반응해야 할 때 사용한다
/// (예: `Cancelled`는 사용자에게 표시하지 않음).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// 제출 전 로컬 검증 실패
    Validation,
    /// 로컬 rate limit 초과
    RateLimit,
    /// 전송 실패 또는 2xx 이외의 응답
    Network,
    /// 시도 시간 초과 (재시도 정책상 Network와 동일 취급)
    Timeout,
    /// 새 제출에 의해 취소됨
    Cancelled,
    /// 응답 파싱, 저장소, 설정 등 기타
    Internal,
}

impl FailureKind {
    /// 재시도 대상 여부
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::Network | FailureKind::Timeout)
    }
}

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 제출 데이터 검증 실패 (사유 목록, 검사 순서 유지)
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// Rate Limit 초과
    #[error("Too many submissions. Please wait {retry_after_secs} seconds.")]
    RateLimit {
        /// 재시도까지 남은 시간 (초)
        retry_after_secs: u64,
    },

    /// 네트워크 에러 (연결 실패 등)
    #[error("{0}")]
    Network(String),

    /// 시도 타임아웃
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// 초과된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 2xx 이외의 HTTP 응답
    #[error("{message}")]
    Http {
        /// HTTP 상태 코드
        status: u16,
        /// 서버 `error` 필드 또는 `HTTP <status>: <reason>`
        message: String,
    },

    /// 2xx 응답이지만 본문이 잘못됨
    #[error("{0}")]
    InvalidResponse(String),

    /// 새 제출에 의해 취소됨
    #[error("Request was cancelled")]
    Cancelled,

    /// 로컬 저장소 에러
    #[error("Storage error: {0}")]
    Storage(String),

    /// 설정값 오류
    #[error("{0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 에러 분류
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CoreError::Validation(_) => FailureKind::Validation,
            CoreError::RateLimit { .. } => FailureKind::RateLimit,
            CoreError::Network(_) | CoreError::Http { .. } => FailureKind::Network,
            CoreError::Timeout { .. } => FailureKind::Timeout,
            CoreError::Cancelled => FailureKind::Cancelled,
            CoreError::InvalidResponse(_)
            | CoreError::Storage(_)
            | CoreError::Config(_)
            | CoreError::Serialization(_)
            | CoreError::Io(_) => FailureKind::Internal,
        }
    }

    /// 재시도 가능한 에러인지 판별
    pub fn is_retryable(&self) -> bool {
        self.failure_kind().is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages;

    #[test]
    fn validation_joins_reasons() {
        let err = CoreError::Validation(vec![
            "Invalid rating".to_string(),
            "Comment too long".to_string(),
        ]);
        assert_eq!(err.to_string(), "Invalid rating, Comment too long");
        assert_eq!(err.failure_kind(), FailureKind::Validation);
    }

    #[test]
    fn rate_limit_message_includes_wait() {
        let err = CoreError::RateLimit {
            retry_after_secs: 42,
        };
        assert_eq!(
            err.to_string(),
            "Too many submissions. Please wait 42 seconds."
        );
        assert!(err.to_string().starts_with(messages::RATE_LIMIT_EXCEEDED));
    }

    #[test]
    fn retryable_classification() {
        assert!(CoreError::Network("down".into()).is_retryable());
        assert!(CoreError::Timeout { timeout_ms: 10_000 }.is_retryable());
        assert!(CoreError::Http {
            status: 500,
            message: "boom".into()
        }
        .is_retryable());
        assert!(!CoreError::Cancelled.is_retryable());
        assert!(!CoreError::InvalidResponse("bad".into()).is_retryable());
        assert!(!CoreError::Validation(vec![]).is_retryable());
    }

    #[test]
    fn cancellation_is_distinct_from_network() {
        assert_eq!(CoreError::Cancelled.failure_kind(), FailureKind::Cancelled);
        assert_ne!(
            CoreError::Cancelled.to_string(),
            CoreError::Network(messages::NETWORK_ERROR.into()).to_string()
        );
    }
}
