//! ユーザー向け通知 Outbound ポート
//!
//! 送りっぱなしで応答は不要。失敗しても usecase の制御フローには影響しない。

use crate::domain::Notification;

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
