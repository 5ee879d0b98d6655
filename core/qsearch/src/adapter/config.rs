//! アプリ設定（<home>/config.json）の読み込み
//!
//! ファイルが無ければ既定値。JSON が不正・値が範囲外なら使い方のエラーとして返す。

use crate::domain::DEFAULT_SEARCH_ENGINE_URL;
use crate::usecase::OverlapPolicy;
use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_LAUNCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_PERSISTENCE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search_engine_url: String,
    pub launch_timeout_ms: u64,
    pub persistence_timeout_ms: u64,
    pub overlap_policy: OverlapPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_engine_url: DEFAULT_SEARCH_ENGINE_URL.to_string(),
            launch_timeout_ms: DEFAULT_LAUNCH_TIMEOUT_MS,
            persistence_timeout_ms: DEFAULT_PERSISTENCE_TIMEOUT_MS,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_millis(self.persistence_timeout_ms)
    }

    fn validate(self) -> Result<Self, Error> {
        if self.launch_timeout_ms == 0 || self.persistence_timeout_ms == 0 {
            return Err(Error::invalid_argument(
                "config: launch_timeout_ms and persistence_timeout_ms must be greater than 0",
            ));
        }
        Ok(self)
    }
}

/// <home>/config.json を読む（無ければ既定値）
pub fn load_app_config(fs: &dyn FileSystem, home_dir: &HomeDir) -> Result<AppConfig, Error> {
    let path = home_dir.config_path();
    if !fs.exists(&path) {
        return Ok(AppConfig::default());
    }
    let s = fs.read_to_string(&path)?;
    let config: AppConfig = serde_json::from_str(&s).map_err(|e| {
        Error::invalid_argument(format!("Invalid config '{}': {}", path.display(), e))
    })?;
    config.validate()
}
