//! Mock 서버 모듈
//!
//! 클라이언트 통합 테스트를 위한 경량 mock 피드백 서버.
//! Axum 기반으로 `/api/feedback`, `/health`를 모의합니다.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Mock 서버 상태
#[derive(Debug, Default)]
pub struct MockServerState {
    /// `/api/feedback` 수신 횟수
    pub attempts: AtomicU32,
    /// 처음 N회는 503으로 실패 (에러 문구에 시도 번호 포함)
    pub fail_first: AtomicU32,
    /// 응답 전 지연 (밀리초)
    pub delay_ms: AtomicU64,
    /// 각 시도 수신 시각
    pub attempt_times: RwLock<Vec<Instant>>,
    /// 성공 처리된 제출 본문
    pub submissions: RwLock<Vec<Value>>,
}

/// Mock 서버 핸들
pub struct MockServer {
    pub addr: String,
    pub state: Arc<MockServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl MockServer {
    /// 새 mock 서버 시작 (자동 포트 할당)
    pub async fn start() -> Self {
        let state = Arc::new(MockServerState::default());
        let app = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("포트 바인딩 실패");
        let actual_port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        // 서버 태스크 시작
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("서버 실행 실패");
        });

        // 서버 시작 대기
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            addr: format!("http://127.0.0.1:{}", actual_port),
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// 서버 주소 반환
    pub fn url(&self) -> &str {
        &self.addr
    }

    /// 처음 `n`회 요청을 실패시킴
    pub fn fail_first(&self, n: u32) {
        self.state.fail_first.store(n, Ordering::SeqCst);
    }

    /// 응답 지연 설정
    pub fn delay(&self, delay: Duration) {
        self.state
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// `/api/feedback` 수신 횟수
    pub fn attempts(&self) -> u32 {
        self.state.attempts.load(Ordering::SeqCst)
    }

    /// 연속 시도 간 간격
    pub fn attempt_gaps(&self) -> Vec<Duration> {
        self.state
            .attempt_times
            .read()
            .windows(2)
            .map(|w| w[1].duration_since(w[0]))
            .collect()
    }

    /// 성공 처리된 제출 본문
    pub fn submissions(&self) -> Vec<Value> {
        self.state.submissions.read().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// 라우터 생성
fn create_router(state: Arc<MockServerState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/feedback", post(handle_feedback))
        .with_state(state)
}

/// 헬스 체크 핸들러
async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// 피드백 제출 핸들러
async fn handle_feedback(
    State(state): State<Arc<MockServerState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let attempt = state.attempts.fetch_add(1, Ordering::SeqCst) + 1;
    state.attempt_times.write().push(Instant::now());

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if attempt <= state.fail_first.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": format!("Server busy (attempt {attempt})") })),
        );
    }

    state.submissions.write().push(body);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "id": format!("fb_{attempt}"),
            "message": "Feedback received"
        })),
    )
}
