//! # feedbee-app
//!
//! Feedbee 클라이언트 바이너리 진입점.
//! DI 구성(HTTP 클라이언트, 로컬 저장소, 폼)과 로깅 초기화, 서브커맨드 실행.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use feedbee_core::config::{WidgetConfig, WidgetOptions};
use feedbee_core::config_manager::ConfigManager;
use feedbee_core::models::feedback::FeedbackRating;
use feedbee_core::ports::api_client::{FeedbackApi, ScreenshotUpload};
use feedbee_core::ports::clock::SystemClock;
use feedbee_core::ports::storage::KeyValueStore;
use feedbee_network::HttpFeedbackClient;
use feedbee_pipeline::{FeedbackForm, FormOutcome, PageContext};
use feedbee_storage::{MemoryStore, SqliteStore};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// 로컬 DB 파일 이름
const DB_FILE_NAME: &str = "feedbee.db";

/// Feedbee 피드백 클라이언트
#[derive(Parser, Debug)]
#[command(name = "feedbee")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 클라이언트 ID
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// 서버 URL (기본: https://feedbee.willsmithte.com)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// 환경 태그 (예: production, staging)
    #[arg(long, global = true)]
    environment: Option<String>,

    /// 로컬 데이터 경로 (rate limit 기록, 기억된 이메일)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 피드백 제출
    Submit(SubmitArgs),
    /// 서버 헬스 체크
    Health,
    /// 적용된 설정 출력 (JSON)
    Config,
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    /// 평점 (1: Needs work, 2: It's okay, 3: Pretty good, 4: Amazing!)
    #[arg(long, short = 'r', value_parser = parse_rating)]
    rating: FeedbackRating,

    /// 코멘트
    #[arg(long, short = 'c')]
    comment: Option<String>,

    /// 답장 받을 이메일 (지정하면 이메일 공유에 동의한 것으로 처리)
    #[arg(long, short = 'e')]
    email: Option<String>,

    #[arg(long, default_value = "")]
    page_url: String,

    #[arg(long, default_value = "")]
    page_title: String,

    #[arg(long)]
    referrer: Option<String>,

    /// 첨부할 스크린샷 (최대 3개)
    #[arg(long = "screenshot")]
    screenshots: Vec<PathBuf>,
}

fn parse_rating(value: &str) -> Result<FeedbackRating, String> {
    let rating: i64 = value
        .parse()
        .map_err(|_| format!("평점은 1~4 정수여야 합니다: {value}"))?;
    FeedbackRating::try_from(rating)
}

impl Args {
    /// CLI 인자를 옵션으로 변환 (설정 파일 값 위에 덮어씀)
    fn overrides(&self) -> WidgetOptions {
        WidgetOptions {
            client_id: self.client_id.clone(),
            base_url: self.base_url.clone(),
            environment: self.environment.clone(),
            ..Default::default()
        }
    }
}

/// 데이터베이스 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.feedbee.feedbee/feedbee.db`
/// - Windows: `%APPDATA%\feedbee\feedbee\data\feedbee.db`
/// - Linux: `~/.local/share/feedbee/feedbee.db`
fn resolve_db_path(data_dir: Option<&Path>) -> PathBuf {
    data_dir
        .map(|d| d.join(DB_FILE_NAME))
        .or_else(|| {
            ProjectDirs::from("com", "feedbee", "feedbee").map(|p| p.data_dir().join(DB_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(".").join(DB_FILE_NAME))
}

/// 로컬 저장소 열기 (실패하면 인메모리로 대체)
fn open_store(data_dir: Option<&Path>) -> Arc<dyn KeyValueStore> {
    let db_path = resolve_db_path(data_dir);
    match SqliteStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("로컬 저장소 열기 실패, 인메모리 사용: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}

/// 스크린샷 파일 읽기
fn read_screenshot(path: &Path) -> Result<ScreenshotUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("스크린샷 읽기 실패: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("파일 이름이 없습니다: {}", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(ScreenshotUpload {
        file_name,
        mime_type,
        bytes,
    })
}

async fn run_submit(
    args: SubmitArgs,
    config: WidgetConfig,
    api: Arc<dyn FeedbackApi>,
    store: Arc<dyn KeyValueStore>,
) -> Result<ExitCode> {
    let mut form = FeedbackForm::new(config, api, store, Arc::new(SystemClock));
    form.open();
    form.set_rating(Some(args.rating));
    if let Some(comment) = args.comment {
        form.set_comment(comment);
    }
    if let Some(email) = args.email {
        form.set_share_email(true);
        form.set_email(email);
    }

    for path in &args.screenshots {
        let upload = read_screenshot(path)?;
        form.add_screenshot(upload)
            .await
            .map_err(|e| anyhow!("{}: {e}", path.display()))?;
    }

    let page = PageContext {
        url: args.page_url,
        title: args.page_title,
        referrer: args.referrer,
    };

    match form.submit(&page).await {
        FormOutcome::Submitted(data) => {
            debug!("제출 데이터: {:?}", data);
            if let Some(message) = form.message() {
                println!("{}", message.text);
            }
            Ok(ExitCode::SUCCESS)
        }
        FormOutcome::Failed(text) => {
            eprintln!("{text}");
            Ok(ExitCode::FAILURE)
        }
        FormOutcome::NotAllowed | FormOutcome::Superseded => {
            eprintln!("제출하지 못했습니다");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// 서브커맨드에 맞춰 설정 구성 (`health`는 client ID 검증을 건너뜀)
fn resolve_config(command: &Command, options: WidgetOptions) -> Result<WidgetConfig> {
    match command {
        Command::Health => Ok(WidgetConfig::from_options_unchecked(options)),
        _ => Ok(WidgetConfig::from_options(options)?),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new()?,
    };
    let file_options = manager.load();

    // tracing 초기화 (RUST_LOG > --log-level > 설정 파일 debug)
    let debug_enabled = file_options
        .as_ref()
        .ok()
        .and_then(|o| o.debug)
        .unwrap_or(false);
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| if debug_enabled { "debug" } else { "warn" }.to_string());
    let log_filter = format!(
        "feedbee={level},feedbee_app={level},feedbee_core={level},feedbee_network={level},feedbee_storage={level},feedbee_pipeline={level}"
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let options = file_options?.merge(args.overrides());
    let config = resolve_config(&args.command, options)?;
    info!(
        "설정 로드: base_url={}, client_id={}",
        config.base_url, config.client_id
    );

    match args.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let api = HttpFeedbackClient::from_config(&config)?;
            if api.health_check().await {
                println!("ok");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("unreachable");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Submit(submit_args) => {
            let api: Arc<dyn FeedbackApi> = Arc::new(HttpFeedbackClient::from_config(&config)?);
            let store = open_store(args.data_dir.as_deref());
            run_submit(submit_args, config, api, store).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_submit_command() {
        let args = Args::try_parse_from([
            "feedbee",
            "--client-id",
            "client-12345678",
            "submit",
            "--rating",
            "3",
            "--comment",
            "Great!",
            "--screenshot",
            "a.png",
            "--screenshot",
            "b.png",
        ])
        .unwrap();

        assert_eq!(args.client_id.as_deref(), Some("client-12345678"));
        let Command::Submit(submit) = args.command else {
            panic!("expected submit");
        };
        assert_eq!(submit.rating, FeedbackRating::PrettyGood);
        assert_eq!(submit.comment.as_deref(), Some("Great!"));
        assert_eq!(submit.screenshots.len(), 2);
    }

    #[test]
    fn rejects_out_of_range_rating() {
        assert!(Args::try_parse_from(["feedbee", "submit", "--rating", "5"]).is_err());
        assert!(Args::try_parse_from(["feedbee", "submit", "--rating", "abc"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["feedbee", "health", "--base-url", "http://localhost:3000"])
                .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(args.overrides().base_url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn health_does_not_require_client_id() {
        let args =
            Args::try_parse_from(["feedbee", "health", "--base-url", "http://localhost:3000"])
                .unwrap();
        let config = resolve_config(&args.command, args.overrides()).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");

        let args = Args::try_parse_from(["feedbee", "config"]).unwrap();
        let err = resolve_config(&args.command, args.overrides()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"), "{err}");
    }

    #[test]
    fn db_path_prefers_data_dir() {
        let path = resolve_db_path(Some(Path::new("/tmp/feedbee-data")));
        assert_eq!(path, PathBuf::from("/tmp/feedbee-data/feedbee.db"));
    }

    #[test]
    fn screenshot_mime_guessed_from_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let upload = read_screenshot(&path).unwrap();
        assert_eq!(upload.file_name, "shot.png");
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.bytes.len(), 4);
    }
}
