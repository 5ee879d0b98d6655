//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリ・ログファイルを環境変数から解決する。
//! usecase / adapter はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリ（履歴・設定・ログの置き場所）を解決する
    ///
    /// 優先順位:
    /// 1. QSEARCH_HOME（設定されていれば）
    /// 2. $XDG_DATA_HOME/qsearch（XDG_DATA_HOME が設定されていれば）
    /// 3. $HOME/.local/share/qsearch
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// QSEARCH_LOG_FILE で明示されたログファイル（未設定なら None）
    fn log_file_override(&self) -> Option<PathBuf>;
}
