//! 클라이언트별 슬라이딩 윈도우 rate limiter.
//!
//! 제출 시각 목록을 로컬 키-값 저장소에 JSON 배열로 보관한다.
//! 저장소 장애나 파싱 실패는 항상 허용(fail open)으로 처리한다.
//! 읽기-수정-쓰기는 프로세스 간 원자적이지 않으므로 권고 수준의 제한이다.

use feedbee_core::config::RateLimitPolicy;
use feedbee_core::error::CoreError;
use feedbee_core::ports::clock::Clock;
use feedbee_core::ports::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// 저장소 키 접두사
const KEY_PREFIX: &str = "feedback_rate_limit_";

/// rate limit 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// 거부 시 다음 제출까지 남은 초 (올림)
    pub remaining_time_secs: Option<u64>,
}

impl RateLimitDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            remaining_time_secs: None,
        }
    }

    /// 거부 결과를 `CoreError::RateLimit`으로 변환 (허용이면 `Ok`)
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.allowed {
            Ok(())
        } else {
            Err(CoreError::RateLimit {
                retry_after_secs: self.remaining_time_secs.unwrap_or(0),
            })
        }
    }
}

/// 슬라이딩 윈도우 rate limiter
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn storage_key(client_id: &str) -> String {
        format!("{KEY_PREFIX}{client_id}")
    }

    /// 저장된 시각 목록 로드 (없거나 실패하면 빈 목록)
    fn load_timestamps(&self, key: &str) -> Vec<i64> {
        if !self.store.is_available() {
            return Vec::new();
        }

        match self.store.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("rate limit 기록 파싱 실패, 초기화: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("rate limit 기록 읽기 실패: {e}");
                Vec::new()
            }
        }
    }

    /// 제출 가능 여부 판정
    ///
    /// 허용되면 현재 시각을 기록에 추가한다. 거부되면 기록을 건드리지 않는다.
    pub fn check(&self, client_id: &str, policy: &RateLimitPolicy) -> RateLimitDecision {
        let key = Self::storage_key(client_id);
        let now = self.clock.now_epoch_ms();
        let window_start = now - policy.window_ms;

        let mut timestamps: Vec<i64> = self
            .load_timestamps(&key)
            .into_iter()
            .filter(|ts| *ts > window_start)
            .collect();

        if timestamps.len() >= policy.max_submissions {
            let oldest = timestamps.iter().copied().min().unwrap_or(now);
            let remaining_ms = (policy.window_ms - (now - oldest)).max(0);
            let remaining_secs = (remaining_ms as u64).div_ceil(1_000);

            debug!(
                "rate limit 초과: client_id={client_id}, count={}, remaining={remaining_secs}s",
                timestamps.len()
            );
            return RateLimitDecision {
                allowed: false,
                remaining_time_secs: Some(remaining_secs),
            };
        }

        timestamps.push(now);
        if self.store.is_available() {
            match serde_json::to_string(&timestamps) {
                Ok(raw) => {
                    if let Err(e) = self.store.set(&key, &raw) {
                        warn!("rate limit 기록 저장 실패: {e}");
                    }
                }
                Err(e) => warn!("rate limit 기록 직렬화 실패: {e}"),
            }
        }

        RateLimitDecision::allow()
    }
}
