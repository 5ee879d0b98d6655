//! 通知を stderr に 1 行ずつ出す Notifier 実装

use crate::domain::{Notification, NotificationKind};
use crate::ports::outbound::Notifier;

#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        eprintln!("{}", format_notification(notification));
    }
}

/// `[ok] ...` / `[error] ...` / `[info] ...`
pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
    };
    format!("[{}] {}", tag, notification.message)
}
