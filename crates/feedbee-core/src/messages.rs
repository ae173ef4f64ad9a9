//! 사용자 노출 메시지 및 기본 상수.

/// 기본 피드백 서버 주소
pub const DEFAULT_API_URL: &str = "https://feedbee.willsmithte.com";

/// 기본 패널 제목
pub const DEFAULT_TITLE: &str = "Share Feedback";

/// 기본 코멘트 placeholder
pub const DEFAULT_PLACEHOLDER: &str = "Tell us what you think... (optional)";

/// 코멘트 최대 길이 (문자 수)
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// 이메일 최대 길이
pub const MAX_EMAIL_LENGTH: usize = 254;

/// client ID 최소 길이
pub const MIN_CLIENT_ID_LENGTH: usize = 8;

/// 폼당 최대 스크린샷 수
pub const MAX_SCREENSHOTS: usize = 3;

/// 스크린샷 파일 최대 크기 (10MiB)
pub const MAX_SCREENSHOT_BYTES: u64 = 10 * 1024 * 1024;

pub const NETWORK_ERROR: &str = "Connection error. Try again.";
pub const RATE_LIMIT_EXCEEDED: &str = "Too many submissions";
pub const INVALID_CLIENT_ID: &str = "Invalid config. Contact admin.";
pub const GENERIC_ERROR: &str = "Error occurred. Try again.";
pub const UPLOAD_FAILED: &str = "Upload failed";

/// 서버가 `message`를 주지 않았을 때의 성공 메시지
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Feedback submitted successfully";

/// 폼 성공 안내 문구
pub const THANK_YOU: &str = "Thank you for your feedback!";
