//! # feedbee-pipeline
//!
//! 피드백 제출 파이프라인.
//! 검증 → rate limit → API 제출을 오케스트레이터가 순서대로 실행하고,
//! 폼 상태가 결과를 사용자 메시지로 변환한다.
//!
//! ## 구조
//!
//! - [`rate_limiter`]: 클라이언트별 슬라이딩 윈도우 제한 (fail open)
//! - [`preferences`]: 기억된 사용자 이메일
//! - [`orchestrator`]: 제출 순서/취소/로딩 상태 관리
//! - [`form`]: 폼 입력, 스크린샷, 키보드 단축키, 결과 메시지

pub mod form;
pub mod orchestrator;
pub mod preferences;
pub mod rate_limiter;

#[cfg(test)]
pub(crate) mod testing;

pub use form::{FeedbackForm, FormOutcome, PageContext};
pub use orchestrator::SubmissionOrchestrator;
pub use rate_limiter::RateLimiter;
