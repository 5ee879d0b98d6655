//! 永続キー・値ストア Outbound ポート
//!
//! 履歴はキー `searchHistory` に、リスト全体を 1 つの文字列として保存する。
//! プロセス再起動後も残ることが前提。

use common::error::Error;

/// 文字列のキー・値ストア
///
/// 実装は `FileKeyValueStore`（JSON ファイル）、`TimeoutKeyValueStore`（制限時間付きラッパ）など。
pub trait KeyValueStore: Send + Sync {
    /// 値を読む。キーが無ければ Ok(None)
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// 値を書く（上書き）
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}
