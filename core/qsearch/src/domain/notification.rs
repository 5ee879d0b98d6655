//! ユーザー向けの一時的な通知（トースト相当）

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// 通知 1 件。送りっぱなしで、制御フローには影響しない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn search_opened(query: &str) -> Self {
        Self::new(
            NotificationKind::Success,
            format!("Opened search for \"{}\"", query),
        )
    }

    pub fn launch_failed(reason: &str) -> Self {
        Self::new(
            NotificationKind::Error,
            format!("Could not open the browser: {}", reason),
        )
    }

    /// ブラウザは開いたが履歴に追加できなかった
    pub fn not_recorded(reason: &str) -> Self {
        Self::new(
            NotificationKind::Error,
            format!("Search opened but not saved to history: {}", reason),
        )
    }

    pub fn entry_deleted() -> Self {
        Self::new(NotificationKind::Info, "Search removed from history")
    }

    pub fn history_cleared() -> Self {
        Self::new(NotificationKind::Info, "Search history cleared")
    }
}
