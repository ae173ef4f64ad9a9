//! 제출 결과 모델.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FailureKind};

/// 제출 결과
///
/// 파이프라인 어느 단계에서 실패하더라도 같은 형태로 반환한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    /// 서버 응답 본문 (불투명)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 실패 분류 (로컬 전용, 직렬화하지 않음)
    #[serde(skip)]
    pub failure_kind: Option<FailureKind>,
}

impl SubmissionResponse {
    /// 성공 결과
    pub fn succeeded(data: serde_json::Value, message: String, id: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message),
            id,
            failure_kind: None,
        }
    }

    /// 에러를 실패 결과로 변환
    pub fn from_error(error: &CoreError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            failure_kind: Some(error.failure_kind()),
            ..Self::default()
        }
    }

    /// 새 제출에 의해 취소된 결과인지
    pub fn is_cancelled(&self) -> bool {
        self.failure_kind == Some(FailureKind::Cancelled)
    }
}

impl From<CoreError> for SubmissionResponse {
    fn from(error: CoreError) -> Self {
        Self::from_error(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_error_keeps_message_and_kind() {
        let resp = SubmissionResponse::from_error(&CoreError::Timeout { timeout_ms: 10_000 });
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Request timed out after 10000ms"));
        assert_eq!(resp.failure_kind, Some(FailureKind::Timeout));
        assert!(!resp.is_cancelled());
    }

    #[test]
    fn cancelled_flag() {
        let resp: SubmissionResponse = CoreError::Cancelled.into();
        assert!(resp.is_cancelled());
    }

    #[test]
    fn failure_kind_not_serialized() {
        let resp: SubmissionResponse = CoreError::Network("down".into()).into();
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "down");
        assert!(value.get("failureKind").is_none());
        assert!(value.get("data").is_none());
    }
}
