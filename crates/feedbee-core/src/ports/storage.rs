//! 로컬 키-값 저장소 포트.
//!
//! 브라우저 localStorage에 해당하는 동기식 문자열 저장소.
//! 모든 호출은 실패할 수 있으며, 호출자는 `Err`를 "저장소 사용 불가"로
//! 간주하고 안전한 기본값으로 진행해야 한다.
//!
//! 구현: `feedbee-storage` crate (`MemoryStore`, `SqliteStore`)

use crate::error::CoreError;

/// 문자열 키-값 저장소
pub trait KeyValueStore: Send + Sync {
    /// 저장소 사용 가능 여부
    fn is_available(&self) -> bool {
        true
    }

    /// 값 조회 (없으면 `None`)
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (기존 값 덮어쓰기)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 값 삭제 (없어도 성공)
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
