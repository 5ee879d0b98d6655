//! Ctrl+C（SIGINT）等による割り込みを検知する Outbound ポート
//!
//! 対話シェルは 1 操作ごとにこの trait を参照し、true なら実行中の操作を終えてから終了する。

/// 割り込みが要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
