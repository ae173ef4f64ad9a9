//! # feedbee-storage
//!
//! 로컬 키-값 저장소 어댑터.
//! 브라우저 localStorage 역할을 하는 `KeyValueStore` 포트 구현을 제공한다.
//!
//! ## 모듈
//! - `memory`: 프로세스 수명 동안만 유지되는 저장소
//! - `sqlite`: 파일 기반 영구 저장소
//! - `migration`: 스키마 마이그레이션

pub mod memory;
pub mod migration;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
