//! qsearch コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、match でディスパッチする。

use crate::domain::EntryRef;

/// qsearch のサブコマンド
///
/// コマンドなし = 対話シェル起動。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ヘルプ表示
    Help,

    /// 対話シェルを起動（コマンド未指定時）
    Shell,

    /// 検索してブラウザで開く（search <words...>）
    Search { query: String },

    /// 履歴から再検索（again <n|id>）
    Again { target: EntryRef },

    /// 履歴一覧（list）
    List,

    /// 履歴を 1 件削除（delete <n|id>）
    Delete { target: EntryRef },

    /// 履歴を全削除（clear）
    Clear,

    /// 未知のコマンド（エラー用）
    Unknown(String),
}

impl Command {
    /// コマンド名と引数から Command に解析する
    pub fn parse_with_args(name: &str, args: &[String]) -> Self {
        match name {
            "shell" => Command::Shell,
            "help" => Command::Help,
            // 単語はスペース 1 つで連結する（入力欄の文字列に相当）
            "search" => Command::Search {
                query: args.join(" "),
            },
            "again" => match args.first() {
                Some(t) => Command::Again {
                    target: EntryRef::parse(t),
                },
                None => Command::Unknown("again (missing <n|id>)".to_string()),
            },
            "list" => Command::List,
            "delete" => match args.first() {
                Some(t) => Command::Delete {
                    target: EntryRef::parse(t),
                },
                None => Command::Unknown("delete (missing <n|id>)".to_string()),
            },
            "clear" => Command::Clear,
            other => Command::Unknown(other.to_string()),
        }
    }
}
