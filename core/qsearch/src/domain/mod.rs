//! ドメイン型（Newtype、enum、ルール）

pub mod command;
pub mod error;
pub mod history;
pub mod history_blob;
pub mod notification;
pub mod search;

pub use command::Command;
pub use error::HistoryError;
pub use history::{EntryRef, HistoryEntry, HistoryList, HistoryState};
pub use history_blob::{decode_history, encode_history};
pub use notification::{Notification, NotificationKind};
pub use search::{SearchEngine, SearchQuery, DEFAULT_SEARCH_ENGINE_URL};
