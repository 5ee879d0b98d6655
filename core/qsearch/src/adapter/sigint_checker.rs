//! Ctrl+C（SIGINT）で割り込みフラグを立てる InterruptChecker 実装
//!
//! 操作の実行中に受けた場合はフラグだけ立て、操作が終わってから対話シェルが終了する。
//! 入力待ち（操作なし）のときに受けた場合はその場で終了コード 130 で終了する。

use crate::ports::outbound::InterruptChecker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl+C を受けたらフラグを立てる実装
pub struct SigintChecker {
    flag: Arc<AtomicBool>,
}

impl SigintChecker {
    /// SIGINT ハンドラを登録する。`in_operation` は対話シェルが操作の実行中に true にする。
    /// 2 回目以降の登録は ctrlc がエラーを返す。
    pub fn install(in_operation: Arc<AtomicBool>) -> Result<Self, ctrlc::Error> {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = Arc::clone(&flag);
        ctrlc::set_handler(move || {
            flag_clone.store(true, Ordering::SeqCst);
            if !in_operation.load(Ordering::SeqCst) {
                std::process::exit(130);
            }
        })?;
        Ok(Self { flag })
    }
}

impl InterruptChecker for SigintChecker {
    fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 割り込みを検知しないスタブ（ハンドラ登録に失敗した場合やテストで使用）
#[derive(Debug, Default)]
pub struct NoopInterruptChecker;

impl InterruptChecker for NoopInterruptChecker {
    fn is_interrupted(&self) -> bool {
        false
    }
}
