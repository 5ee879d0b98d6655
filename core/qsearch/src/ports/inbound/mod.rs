//! Inbound ポート: UI シェル（CLI / 対話シェル）がアプリを呼び出すインターフェース

use crate::cli::Config;
use crate::domain::{HistoryEntry, HistoryError, HistoryState};
use common::domain::EntryId;
use common::error::Error;

/// UI シェルから送られる操作（入力欄の送信・再検索・削除・全削除）と描画用の状態
///
/// HistoryManager が実装する。
pub trait HistoryIntents: Send + Sync {
    /// 入力欄の文字列そのままで検索する
    fn submit(&self, text: &str) -> Result<HistoryEntry, HistoryError>;

    /// 履歴のクエリで再検索する（元のエントリは残る）
    fn search_again(&self, query: &str) -> Result<HistoryEntry, HistoryError>;

    /// ID の履歴を削除する。削除したら true
    fn delete(&self, id: &EntryId) -> Result<bool, HistoryError>;

    fn clear_all(&self) -> Result<(), HistoryError>;

    /// 描画用の状態
    fn state(&self) -> HistoryState;
}

/// qsearch アプリケーションを実行する Inbound ポート
///
/// main はこの trait を実装した Runner の run を呼び出す。
pub trait UseCaseRunner {
    fn run(&self, config: Config) -> Result<i32, Error>;
}
