//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::HomeDir;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "qsearch";

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvResolver for StdEnvResolver {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = non_empty_var("QSEARCH_HOME") {
            return Ok(HomeDir::new(PathBuf::from(home)));
        }

        let data_base = non_empty_var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                non_empty_var("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })
            .ok_or_else(|| Error::env("HOME is not set"))?;

        Ok(HomeDir::new(data_base.join(APP_DIR)))
    }

    fn log_file_override(&self) -> Option<PathBuf> {
        non_empty_var("QSEARCH_LOG_FILE").map(PathBuf::from)
    }
}
