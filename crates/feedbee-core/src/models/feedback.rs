//! 피드백 모델.
//!
//! 폼에서 수집한 값(`FeedbackData`)과 서버로 전송하는 페이로드(`FeedbackSubmission`).

use serde::{Deserialize, Serialize};

use crate::models::metadata::FeedbackMetadata;

/// 이모지 평점 (나쁨 → 좋음 순서)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum FeedbackRating {
    NeedsWork = 1,
    Okay = 2,
    PrettyGood = 3,
    Amazing = 4,
}

impl FeedbackRating {
    /// 전체 평점 (표시 순서)
    pub const ALL: [FeedbackRating; 4] = [
        FeedbackRating::NeedsWork,
        FeedbackRating::Okay,
        FeedbackRating::PrettyGood,
        FeedbackRating::Amazing,
    ];

    /// 정수 값
    pub fn value(self) -> i64 {
        self as i64
    }

    /// 화면 표시용 라벨
    pub fn label(self) -> &'static str {
        match self {
            FeedbackRating::NeedsWork => "Needs work",
            FeedbackRating::Okay => "It's okay",
            FeedbackRating::PrettyGood => "Pretty good",
            FeedbackRating::Amazing => "Amazing!",
        }
    }
}

impl TryFrom<i64> for FeedbackRating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FeedbackRating::NeedsWork),
            2 => Ok(FeedbackRating::Okay),
            3 => Ok(FeedbackRating::PrettyGood),
            4 => Ok(FeedbackRating::Amazing),
            other => Err(format!("rating out of range: {other}")),
        }
    }
}

impl From<FeedbackRating> for i64 {
    fn from(rating: FeedbackRating) -> Self {
        rating.value()
    }
}

/// 업로드된 스크린샷 참조
///
/// 업로드 후 서버가 돌려준 값이며 이후 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRef {
    pub file_name: String,
    pub url: String,
    /// 바이트 단위
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub mime_type: String,
}

/// 폼에서 수집한 피드백 (위젯 콜백으로 전달)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackData {
    pub rating: FeedbackRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub share_email: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<ScreenshotRef>>,
    pub metadata: FeedbackMetadata,
}

/// 서버 전송 페이로드 (`POST /api/feedback` 본문)
///
/// 제출 호출마다 새로 만들고, 만든 뒤에는 변경하지 않는다.
/// `rating`은 외부 입력을 그대로 담을 수 있도록 정수로 보관하며
/// 범위 검사는 `validation::validate_feedback_submission`이 맡는다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub share_email: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub page_url: String,
    pub page_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<ScreenshotRef>>,
}

impl FeedbackSubmission {
    /// 폼 데이터를 전송 페이로드로 평탄화
    pub fn from_data(client_id: &str, environment: Option<&str>, data: &FeedbackData) -> Self {
        Self {
            client_id: client_id.to_string(),
            rating: Some(data.rating.value()),
            comment: data.comment.clone(),
            share_email: data.share_email,
            user_email: data.user_email.clone(),
            page_url: data.metadata.page_url.clone(),
            page_title: data.metadata.page_title.clone(),
            referrer: data.metadata.referrer.clone(),
            environment: environment.map(str::to_string),
            screenshots: data.screenshots.clone(),
        }
    }
}
