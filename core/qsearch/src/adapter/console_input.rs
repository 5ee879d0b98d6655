//! 端末の入力行を「入力欄」として扱う InputSurface 実装
//!
//! 対話シェルは読み込んだ行を set_text で入力欄に置き、その文字列のまま送信する。
//! 検索が成功すると HistoryManager から clear_input が届き、失敗時は文字列が残る（:retry で再送信できる）。

use crate::ports::outbound::InputSurface;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ConsoleInput {
    text: Mutex<String>,
    focused: AtomicBool,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力欄の文字列を置き換える（入力中の状態になる）
    pub fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
        self.focused.store(true, Ordering::SeqCst);
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }

    #[cfg(test)]
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

impl InputSurface for ConsoleInput {
    fn release_focus(&self) {
        self.focused.store(false, Ordering::SeqCst);
    }

    fn clear_input(&self) {
        self.text.lock().clear();
    }
}
