//! UI シェルの入力欄への合図 Outbound ポート
//!
//! HistoryManager は入力欄の文字列を持たない。検索開始時にフォーカス解除を、
//! 検索成功時に入力欄のクリアを UI シェルへ合図する。

pub trait InputSurface: Send + Sync {
    /// 入力中の状態を解除する（モバイルのキーボードを閉じる操作に相当）
    fn release_focus(&self);

    /// 入力欄を空にする（検索成功時のみ呼ばれる）
    fn clear_input(&self);
}
