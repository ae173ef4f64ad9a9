//! 페이지 메타데이터.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ports::clock::Clock;

/// 제목 뒤에 붙는 사이트명 구분자 (" - ", " | ", " – ", " — ")
static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-|–—]\s.*$").expect("valid title suffix regex"));

const UNKNOWN: &str = "unknown";
const UNTITLED: &str = "Untitled Page";

/// 제출 시점에 한 번 수집하는 페이지 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackMetadata {
    pub page_url: String,
    pub page_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// epoch 밀리초
    pub timestamp: i64,
}

impl FeedbackMetadata {
    /// 호출자가 전달한 페이지 정보로 메타데이터 생성
    ///
    /// 빈 URL은 `"unknown"`, 빈 제목은 `"Untitled Page"`, 빈 referrer는 `None`.
    pub fn capture(
        page_url: &str,
        page_title: &str,
        referrer: Option<&str>,
        clock: &dyn Clock,
    ) -> Self {
        let page_url = match page_url.trim() {
            "" => UNKNOWN.to_string(),
            url => url.to_string(),
        };
        let page_title = match page_title.trim() {
            "" => UNTITLED.to_string(),
            title => title.to_string(),
        };
        let referrer = referrer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Self {
            page_url,
            page_title,
            referrer,
            timestamp: clock.now_epoch_ms(),
        }
    }
}

/// 사이트명 접미사를 제거한 페이지 제목
pub fn clean_page_title(title: &str) -> String {
    let cleaned = TITLE_SUFFIX.replace(title, "");
    let cleaned = cleaned.trim();
    if !cleaned.is_empty() {
        return cleaned.to_string();
    }
    match title.trim() {
        "" => UNTITLED.to_string(),
        raw => raw.to_string(),
    }
}
