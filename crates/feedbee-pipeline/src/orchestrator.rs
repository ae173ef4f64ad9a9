//! 제출 오케스트레이터.
//!
//! 검증 → rate limit → API 제출 순서를 하나의 호출로 묶는다.
//! 인스턴스당 진행 중인 제출은 최대 1개이며, 새 제출이 시작되면
//! 이전 제출의 취소 토큰을 발동하고 그 결과는 상태에 반영하지 않는다.

use feedbee_core::config::RateLimitPolicy;
use feedbee_core::error::{CoreError, FailureKind};
use feedbee_core::models::feedback::FeedbackSubmission;
use feedbee_core::models::response::SubmissionResponse;
use feedbee_core::ports::api_client::FeedbackApi;
use feedbee_core::validation::validate_feedback_submission;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::rate_limiter::RateLimiter;

/// 마지막 제출 에러
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionError {
    pub kind: FailureKind,
    pub message: String,
}

/// 진행 중인 제출
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct OrchestratorState {
    is_loading: bool,
    last_error: Option<SubmissionError>,
    in_flight: Option<InFlight>,
    next_generation: u64,
}

/// 제출 파이프라인 진입점
pub struct SubmissionOrchestrator {
    api: Arc<dyn FeedbackApi>,
    rate_limiter: RateLimiter,
    policy: RateLimitPolicy,
    state: Mutex<OrchestratorState>,
}

/// 종료 경로와 관계없이 진행 상태를 정리
struct InFlightGuard<'a> {
    orchestrator: &'a SubmissionOrchestrator,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.release(self.generation);
    }
}

impl SubmissionOrchestrator {
    pub fn new(
        api: Arc<dyn FeedbackApi>,
        rate_limiter: RateLimiter,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            api,
            rate_limiter,
            policy,
            state: Mutex::new(OrchestratorState::default()),
        }
    }

    /// 네트워크 제출 진행 중 여부
    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    /// 마지막 에러 (다음 `submit` 시작 시 초기화)
    pub fn last_error(&self) -> Option<SubmissionError> {
        self.state.lock().last_error.clone()
    }

    /// 진행 중인 제출 취소
    pub fn cancel(&self) {
        if let Some(in_flight) = self.state.lock().in_flight.as_ref() {
            debug!("진행 중인 제출 취소: generation={}", in_flight.generation);
            in_flight.token.cancel();
        }
    }

    /// 피드백 제출
    ///
    /// 어떤 단계에서 실패하더라도 `SubmissionResponse`를 반환한다.
    /// 새 제출에 밀려 취소된 호출은 `is_cancelled()`가 참인 결과를 받는다.
    pub async fn submit(&self, submission: &FeedbackSubmission) -> SubmissionResponse {
        self.state.lock().last_error = None;

        if let Err(e) = validate_feedback_submission(submission).into_result() {
            debug!("검증 실패: {e}");
            return self.reject(e);
        }

        if let Err(e) = self
            .rate_limiter
            .check(&submission.client_id, &self.policy)
            .into_result()
        {
            info!("rate limit 거부: client_id={}", submission.client_id);
            return self.reject(e);
        }

        let (generation, token) = self.begin();
        let guard = InFlightGuard {
            orchestrator: self,
            generation,
        };

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => SubmissionResponse::from(CoreError::Cancelled),
            response = self.api.submit_feedback(submission) => response,
        };

        self.finish(generation, &response);
        drop(guard);
        response
    }

    /// 로컬 단계 실패 기록
    fn reject(&self, error: CoreError) -> SubmissionResponse {
        let response = SubmissionResponse::from_error(&error);
        self.state.lock().last_error = Some(SubmissionError {
            kind: error.failure_kind(),
            message: error.to_string(),
        });
        response
    }

    /// 이전 제출을 취소하고 새 세대 시작
    fn begin(&self) -> (u64, CancellationToken) {
        let mut state = self.state.lock();
        if let Some(previous) = state.in_flight.take() {
            debug!("이전 제출 대체: generation={}", previous.generation);
            previous.token.cancel();
        }

        state.next_generation += 1;
        let generation = state.next_generation;
        let token = CancellationToken::new();
        state.in_flight = Some(InFlight {
            generation,
            token: token.clone(),
        });
        state.is_loading = true;
        (generation, token)
    }

    /// 현재 세대일 때만 결과를 상태에 반영
    fn finish(&self, generation: u64, response: &SubmissionResponse) {
        let mut state = self.state.lock();
        let is_current = state
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation);
        if !is_current {
            debug!("대체된 제출 결과 무시: generation={generation}");
            return;
        }

        if !response.success {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| feedbee_core::messages::GENERIC_ERROR.to_string());
            warn!("제출 실패: {message}");
            state.last_error = Some(SubmissionError {
                kind: response.failure_kind.unwrap_or(FailureKind::Network),
                message,
            });
        }
    }

    fn release(&self, generation: u64) {
        let mut state = self.state.lock();
        if state
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
        {
            state.in_flight = None;
            state.is_loading = false;
        }
    }
}
