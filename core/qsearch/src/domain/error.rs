//! 履歴操作のエラー型
//!
//! usecase が返すエラー。CLI 境界で common::error::Error に変換して終了コードを決める。

use common::domain::EntryId;
use common::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// 入力の検証エラー（空クエリ）。状態は変わらない
    #[error("{0}")]
    Validation(String),

    /// 別の変更操作が実行中（OverlapPolicy::Reject のときのみ）
    #[error("another history operation is in progress")]
    Busy,

    /// ブラウザ起動の失敗。履歴は変わらない
    #[error("could not open the browser: {0}")]
    Launch(String),

    /// 指定した ID / 番号の履歴が無い
    #[error("no history entry matches '{0}'")]
    NotFound(String),

    /// 保存済み履歴を解釈できない
    #[error("stored history is unreadable: {0}")]
    Corrupt(String),

    #[error("duplicate history entry id '{0}'")]
    DuplicateId(EntryId),
}

impl HistoryError {
    pub fn empty_query() -> Self {
        HistoryError::Validation("empty query".to_string())
    }
}

impl From<HistoryError> for Error {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::Validation(_) | HistoryError::NotFound(_) => {
                Error::invalid_argument(e.to_string())
            }
            HistoryError::Corrupt(_) => Error::json(e.to_string()),
            HistoryError::Busy | HistoryError::Launch(_) | HistoryError::DuplicateId(_) => {
                Error::system(e.to_string())
            }
        }
    }
}
