//! Feedbee 도메인 모델.
//!
//! 위젯과 서버 간에 주고받는 데이터 구조체를 정의한다.
//! 와이어 포맷은 camelCase JSON이다.

pub mod feedback;
pub mod metadata;
pub mod response;
