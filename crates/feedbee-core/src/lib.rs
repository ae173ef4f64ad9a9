//! # feedbee-core
//!
//! Feedbee 도메인 모델, 포트(trait) 정의, 검증기, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde, camelCase 와이어 포맷)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스
//! - [`validation`]: 제출 전 순수 검증 함수
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 위젯 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)
//! - [`messages`]: 사용자 노출 메시지와 상수

pub mod config;
pub mod config_manager;
pub mod error;
pub mod messages;
pub mod models;
pub mod ports;
pub mod validation;

#[cfg(test)]
mod tests {
    use crate::models::feedback::FeedbackRating;

    #[test]
    fn rating_labels() {
        let labels: Vec<_> = FeedbackRating::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(
            labels,
            vec!["Needs work", "It's okay", "Pretty good", "Amazing!"]
        );
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::WidgetConfig::defaults("client-12345678".to_string());
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay_ms, 1_000);
        assert_eq!(config.submit_timeout_ms, 10_000);
        assert_eq!(config.health_timeout_ms, 5_000);
        assert_eq!(config.rate_limit.max_submissions, 5);
        assert_eq!(config.rate_limit.window_ms, 60_000);
    }
}
