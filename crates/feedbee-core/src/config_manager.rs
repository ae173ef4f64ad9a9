//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리에 JSON 파일로 위젯 옵션을 저장/로드한다.

use crate::config::WidgetOptions;
use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 앱 디렉토리 이름
const APP_DIR_NAME: &str = "feedbee";

/// 설정 관리자
///
/// 설정 파일이 없으면 빈 옵션으로 시작한다 (모든 값은 기본값으로 채워짐).
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로로 설정 관리자 생성
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME)))
    }

    /// 지정된 경로로 설정 관리자 생성
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 옵션 로드 (파일이 없으면 빈 옵션)
    pub fn load(&self) -> Result<WidgetOptions, CoreError> {
        if !self.config_path.exists() {
            debug!("설정 파일 없음, 기본값 사용: {}", self.config_path.display());
            return Ok(WidgetOptions::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            CoreError::Config(format!(
                "설정 파일 읽기 실패: {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let options: WidgetOptions = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!(
                "설정 파일 파싱 실패: {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        debug!("설정 파일 로드 완료: {}", self.config_path.display());
        Ok(options)
    }

    /// 옵션 저장 (상위 디렉토리 자동 생성)
    pub fn save(&self, options: &WidgetOptions) -> Result<(), CoreError> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        let content = serde_json::to_string_pretty(options)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(&self.config_path, content).map_err(|e| {
            CoreError::Config(format!(
                "설정 파일 저장 실패: {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        debug!("설정 저장 완료: {}", self.config_path.display());
        Ok(())
    }

    /// 플랫폼별 설정 디렉토리 경로
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        #[cfg(target_os = "macos")]
        {
            // macOS: ~/Library/Application Support/feedbee/
            let home = std::env::var("HOME")
                .map_err(|_| CoreError::Config("HOME 환경 변수를 찾을 수 없습니다".to_string()))?;
            Ok(PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR_NAME))
        }

        #[cfg(target_os = "windows")]
        {
            // Windows: %APPDATA%\feedbee\
            let appdata = std::env::var("APPDATA").map_err(|_| {
                CoreError::Config("APPDATA 환경 변수를 찾을 수 없습니다".to_string())
            })?;
            Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
        }

        #[cfg(target_os = "linux")]
        {
            // Linux: ~/.config/feedbee/
            let home = std::env::var("HOME")
                .map_err(|_| CoreError::Config("HOME 환경 변수를 찾을 수 없습니다".to_string()))?;
            Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            tracing::warn!("지원되지 않는 플랫폼, 현재 디렉토리 사용");
            Ok(PathBuf::from(".").join(APP_DIR_NAME))
        }
    }
}
