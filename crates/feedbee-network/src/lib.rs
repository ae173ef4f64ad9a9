//! # feedbee-network
//!
//! Feedbee 피드백 API HTTP 어댑터.
//! `/api/feedback` 제출(재시도 포함), `/health` 확인, `/api/screenshots` 업로드를 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use feedbee_network::http_client::HttpFeedbackClient;
//!
//! let client = HttpFeedbackClient::from_config(&config)?;
//! let response = client.submit_feedback(&submission).await;
//! ```

pub mod http_client;

pub use http_client::HttpFeedbackClient;
