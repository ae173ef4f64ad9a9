//! 사용자 이메일 기억.
//!
//! 이메일 공유에 동의한 제출이 성공하면 주소를 저장해 두고
//! 다음에 폼을 열 때 미리 채운다. 실패는 모두 로그만 남긴다.

use feedbee_core::ports::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// 저장소 키
pub const USER_EMAIL_KEY: &str = "feedback_user_email";

/// 기억된 이메일 저장소
pub struct EmailPreference {
    store: Arc<dyn KeyValueStore>,
}

impl EmailPreference {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 저장된 이메일 (없거나 실패하면 빈 문자열)
    pub fn load(&self) -> String {
        if !self.store.is_available() {
            return String::new();
        }

        match self.store.get(USER_EMAIL_KEY) {
            Ok(email) => email.unwrap_or_default(),
            Err(e) => {
                warn!("저장된 이메일 읽기 실패: {e}");
                String::new()
            }
        }
    }

    /// 이메일 저장 (빈 값은 무시)
    pub fn save(&self, email: &str) {
        let email = email.trim();
        if email.is_empty() || !self.store.is_available() {
            return;
        }

        match self.store.set(USER_EMAIL_KEY, email) {
            Ok(()) => debug!("이메일 기억 저장"),
            Err(e) => warn!("이메일 저장 실패: {e}"),
        }
    }
}
