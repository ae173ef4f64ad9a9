//! 제출 전 검증.
//!
//! 순수 함수만 둔다. 네트워크나 저장소에 접근하지 않으며
//! 같은 입력에 대해 항상 같은 결과를 낸다.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CoreError;
use crate::messages::{
    MAX_COMMENT_LENGTH, MAX_EMAIL_LENGTH, MAX_SCREENSHOT_BYTES, MIN_CLIENT_ID_LENGTH,
};
use crate::models::feedback::{FeedbackRating, FeedbackSubmission};

static SCRIPT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// 검증 결과 (사유는 검사 순서대로 누적)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// `Result`로 변환
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// 제출 페이로드 검증
///
/// 평점 또는 코멘트 중 하나는 있어야 한다. 모든 사유를 누적한다.
pub fn validate_feedback_submission(data: &FeedbackSubmission) -> ValidationResult {
    let mut errors = Vec::new();

    let has_comment = data
        .comment
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());

    if data.rating.is_none() && !has_comment {
        errors.push("Add rating or comment".to_string());
    }

    if let Some(rating) = data.rating {
        if FeedbackRating::try_from(rating).is_err() {
            errors.push("Invalid rating".to_string());
        }
    }

    // 길이/스크립트 검사는 공백뿐인 코멘트에도 적용
    if let Some(comment) = data.comment.as_deref() {
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            errors.push("Comment too long".to_string());
        }
        if SCRIPT_TAG.is_match(comment) {
            errors.push("Invalid comment".to_string());
        }
    }

    if data.share_email {
        if let Some(email) = data.user_email.as_deref().filter(|e| !e.is_empty()) {
            errors.extend(validate_email(email).errors);
        }
    }

    ValidationResult::from_errors(errors)
}

/// 이메일 검증 (형식 오류와 길이 오류는 함께 보고)
pub fn validate_email(email: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if email.trim().is_empty() {
        errors.push("Email required".to_string());
    } else {
        if !EMAIL.is_match(email) {
            errors.push("Invalid email".to_string());
        }
        if email.chars().count() > MAX_EMAIL_LENGTH {
            errors.push("Email too long".to_string());
        }
    }

    ValidationResult::from_errors(errors)
}

/// client ID 검증
pub fn validate_client_id(client_id: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if client_id.trim().is_empty() {
        errors.push(format!("Invalid client ID '{client_id}': must not be empty"));
    } else if client_id.chars().count() < MIN_CLIENT_ID_LENGTH {
        errors.push(format!(
            "Invalid client ID '{client_id}': must be at least {MIN_CLIENT_ID_LENGTH} characters"
        ));
    }

    ValidationResult::from_errors(errors)
}

/// 스크린샷 파일 사전 검증 (이미지 타입, 10MB 이하)
pub fn validate_screenshot_file(mime_type: &str, size_bytes: u64) -> ValidationResult {
    let mut errors = Vec::new();

    if size_bytes > MAX_SCREENSHOT_BYTES {
        errors.push("Max 10MB".to_string());
    } else if !mime_type.starts_with("image/") {
        errors.push("Image files only".to_string());
    }

    ValidationResult::from_errors(errors)
}

/// HTML 특수문자 이스케이프 + 앞뒤 공백 제거
///
/// 렌더러 자체 이스케이프와 별개로, 사용자 텍스트를 마크업에 넣기 전에 적용한다.
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(rating: Option<i64>, comment: Option<&str>) -> FeedbackSubmission {
        FeedbackSubmission {
            client_id: "client-12345678".to_string(),
            rating,
            comment: comment.map(str::to_string),
            page_url: "https://example.com".to_string(),
            page_title: "Example".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_rating_and_comment() {
        let result = validate_feedback_submission(&submission(None, None));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Add rating or comment"]);

        let whitespace = validate_feedback_submission(&submission(None, Some("   ")));
        assert_eq!(whitespace.errors, vec!["Add rating or comment"]);
    }

    #[test]
    fn comment_alone_is_enough() {
        assert!(validate_feedback_submission(&submission(None, Some("hi"))).is_valid);
    }

    #[test]
    fn ratings_out_of_range() {
        for rating in [0, 5, -1, 100] {
            let result = validate_feedback_submission(&submission(Some(rating), None));
            assert_eq!(result.errors, vec!["Invalid rating"], "rating {rating}");
        }
        for rating in 1..=4 {
            assert!(validate_feedback_submission(&submission(Some(rating), None)).is_valid);
        }
    }

    #[test]
    fn comment_length_boundary() {
        let ok = "a".repeat(1000);
        assert!(validate_feedback_submission(&submission(Some(2), Some(&ok))).is_valid);

        let long = "a".repeat(1001);
        let result = validate_feedback_submission(&submission(Some(2), Some(&long)));
        assert_eq!(result.errors, vec!["Comment too long"]);
    }

    #[test]
    fn whitespace_comment_still_length_checked() {
        let blank = " ".repeat(1001);
        let result = validate_feedback_submission(&submission(Some(3), Some(&blank)));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Comment too long"]);

        let short_blank = " ".repeat(10);
        assert!(validate_feedback_submission(&submission(Some(3), Some(&short_blank))).is_valid);
    }

    #[test]
    fn comment_length_counts_characters() {
        let emoji = "😊".repeat(1000);
        assert!(validate_feedback_submission(&submission(Some(2), Some(&emoji))).is_valid);
    }

    #[test]
    fn script_tags_rejected_case_insensitive() {
        for comment in [
            "<script>alert(1)</script>",
            "nice <SCRIPT type=\"text/javascript\">x()</ScRiPt> site",
            "<script>\nmulti\nline\n</script>",
        ] {
            let result = validate_feedback_submission(&submission(Some(3), Some(comment)));
            assert_eq!(result.errors, vec!["Invalid comment"], "{comment}");
        }
    }

    #[test]
    fn errors_accumulate_in_check_order() {
        let comment = format!("<script>x</script>{}", "a".repeat(1000));
        let result = validate_feedback_submission(&submission(Some(9), Some(&comment)));
        assert_eq!(
            result.errors,
            vec!["Invalid rating", "Comment too long", "Invalid comment"]
        );
        let err = result.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid rating, Comment too long, Invalid comment"
        );
    }

    #[test]
    fn shared_email_is_checked() {
        let mut data = submission(Some(3), None);
        data.share_email = true;
        data.user_email = Some("not-an-email".to_string());
        assert_eq!(validate_feedback_submission(&data).errors, vec!["Invalid email"]);

        data.user_email = Some(String::new());
        assert!(validate_feedback_submission(&data).is_valid);

        data.share_email = false;
        data.user_email = Some("not-an-email".to_string());
        assert!(validate_feedback_submission(&data).is_valid);
    }

    #[test]
    fn validation_is_idempotent() {
        let data = submission(Some(7), Some("<script></script>"));
        assert_eq!(
            validate_feedback_submission(&data),
            validate_feedback_submission(&data)
        );
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("a@b.com").is_valid);
        assert_eq!(validate_email("").errors, vec!["Email required"]);
        assert_eq!(validate_email("a@b").errors, vec!["Invalid email"]);
        assert_eq!(validate_email("a b@c.com").errors, vec!["Invalid email"]);

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&long).errors, vec!["Email too long"]);

        let long_invalid = "a".repeat(300);
        assert_eq!(
            validate_email(&long_invalid).errors,
            vec!["Invalid email", "Email too long"]
        );
    }

    #[test]
    fn client_id_rules() {
        assert!(validate_client_id("client-12345678").is_valid);
        assert!(validate_client_id("12345678").is_valid);

        let short = validate_client_id("abc");
        assert!(!short.is_valid);
        assert!(short.errors[0].contains("'abc'"));

        let empty = validate_client_id("");
        assert!(empty.errors[0].contains("must not be empty"));
    }

    #[test]
    fn screenshot_file_rules() {
        assert!(validate_screenshot_file("image/png", 1024).is_valid);
        assert_eq!(
            validate_screenshot_file("application/pdf", 1024).errors,
            vec!["Image files only"]
        );
        assert_eq!(
            validate_screenshot_file("image/png", MAX_SCREENSHOT_BYTES + 1).errors,
            vec!["Max 10MB"]
        );
    }

    #[test]
    fn sanitize_escapes_markup() {
        let out = sanitize_input("<img src=x onerror=alert(1)>");
        for forbidden in ['<', '>', '"', '\'', '/'] {
            assert!(!out.contains(forbidden), "{out}");
        }
        assert_eq!(out, "&lt;img src=x onerror=alert(1)&gt;");
    }

    #[test]
    fn sanitize_trims_and_escapes_all_five() {
        assert_eq!(
            sanitize_input("  \"it's\" a/b  "),
            "&quot;it&#x27;s&quot; a&#x2F;b"
        );
        assert_eq!(sanitize_input("plain"), "plain");
    }
}
