//! 인메모리 키-값 저장소.
//!
//! 영구 저장소를 열 수 없을 때의 대체 수단이자 테스트용 저장소.

use feedbee_core::error::CoreError;
use feedbee_core::ports::storage::KeyValueStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// 인메모리 저장소: `KeyValueStore` 포트 구현
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 키 수
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
