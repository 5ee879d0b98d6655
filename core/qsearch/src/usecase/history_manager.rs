//! 検索履歴のユースケース（HistoryManager）
//!
//! 履歴リストと検索中フラグを持ち、検索・再検索・削除・全削除でリストを変更して
//! そのたびにリスト全体をキー・値ストアへ書き戻す。
//!
//! - 変更操作は MutationGate で 1 つずつ実行する（書き込みの後勝ち・取りこぼしを防ぐ）
//! - ストアの読み書き失敗はログに残すだけで、メモリ上のリストを優先する
//! - リストのロックはポート呼び出しをまたいで保持しない（state() は変更中も待たない）

use crate::domain::{
    decode_history, encode_history, EntryRef, HistoryEntry, HistoryError, HistoryList,
    HistoryState, Notification, SearchEngine, SearchQuery,
};
use crate::ports::inbound::HistoryIntents;
use crate::ports::outbound::{InputSurface, KeyValueStore, Notifier, UrlLauncher};
use crate::usecase::mutation_gate::{GatePass, MutationGate, OverlapPolicy};
use chrono::{DateTime, Utc};
use common::domain::EntryId;
use common::ports::outbound::{Clock, IdGenerator, Log, LogLevel, LogRecord};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 履歴を保存するキー
pub const HISTORY_KEY: &str = "searchHistory";

/// HistoryManager が使う Outbound ポート一式
#[derive(Clone)]
pub struct HistoryPorts {
    pub store: Arc<dyn KeyValueStore>,
    pub launcher: Arc<dyn UrlLauncher>,
    pub notifier: Arc<dyn Notifier>,
    pub input: Arc<dyn InputSurface>,
    pub id_gen: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
    pub log: Arc<dyn Log>,
}

/// 動作設定
#[derive(Debug, Clone, Default)]
pub struct ManagerSettings {
    pub engine: SearchEngine,
    pub overlap_policy: OverlapPolicy,
}

/// 検索中フラグを立て、drop で必ず下ろす
struct SearchingFlag<'a>(&'a AtomicBool);

impl<'a> SearchingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SearchingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 検索履歴の管理
pub struct HistoryManager {
    ports: HistoryPorts,
    engine: SearchEngine,
    history: Mutex<HistoryList>,
    searching: AtomicBool,
    gate: MutationGate,
}

impl HistoryManager {
    /// ストアから履歴を読み込んで作る。読めない・解釈できない値は捨てて空で始める
    pub fn load(ports: HistoryPorts, settings: ManagerSettings) -> Self {
        let history = load_history(ports.store.as_ref(), ports.log.as_ref());
        let manager = Self {
            ports,
            engine: settings.engine,
            history: Mutex::new(history),
            searching: AtomicBool::new(false),
            gate: MutationGate::new(settings.overlap_policy),
        };
        let entries = manager.history.lock().len();
        let policy = match manager.gate.policy() {
            OverlapPolicy::Queue => "queue",
            OverlapPolicy::Reject => "reject",
        };
        manager.debug("history loaded", "history", |r| {
            r.field("entries", entries).field("overlap_policy", policy)
        });
        manager
    }

    /// 検索して成功したら履歴の先頭に追加する
    ///
    /// 空文字列は Validation エラー（ブラウザ起動・履歴変更なし）。
    /// ブラウザ起動に失敗した場合は履歴を変えずにエラー通知を出し、Launch エラーを返す。
    /// 起動後に ID が重複した場合もエラー通知を出し、DuplicateId を返す。
    pub fn submit_search(&self, raw: &str) -> Result<HistoryEntry, HistoryError> {
        let query = SearchQuery::parse(raw)?;
        let _pass = self.enter_gate("search")?;
        let _searching = SearchingFlag::raise(&self.searching);

        self.ports.input.release_focus();
        let url = self.engine.url_for(&query);
        self.debug("launching search", "search", |r| r.field("url", url.as_str()));

        if let Err(e) = self.ports.launcher.open(&url) {
            let reason = e.to_string();
            let _ = self.ports.log.log(
                &LogRecord::new(LogLevel::Warn, "browser launch failed")
                    .layer("usecase")
                    .kind("search")
                    .field("error", reason.as_str()),
            );
            self.ports.notifier.notify(&Notification::launch_failed(&reason));
            return Err(HistoryError::Launch(reason));
        }

        let entry = HistoryEntry::new(
            self.ports.id_gen.next_id(),
            query.into_string(),
            timestamp_from_ms(self.ports.clock.now_ms()),
        );
        let prepended = {
            let mut history = self.history.lock();
            history.prepend(entry.clone()).map(|()| history.clone())
        };
        let snapshot = match prepended {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let reason = e.to_string();
                let _ = self.ports.log.log(
                    &LogRecord::new(LogLevel::Warn, "search not recorded")
                        .layer("usecase")
                        .kind("search")
                        .field("error", reason.as_str()),
                );
                self.ports.notifier.notify(&Notification::not_recorded(&reason));
                return Err(e);
            }
        };
        self.persist(&snapshot, "search");

        self.ports.input.clear_input();
        self.ports.notifier.notify(&Notification::search_opened(&entry.query));
        let _ = self.ports.log.log(
            &LogRecord::new(LogLevel::Info, "search opened")
                .layer("usecase")
                .kind("search")
                .field("entry_id", entry.id.as_str())
                .field("history_len", snapshot.len()),
        );
        Ok(entry)
    }

    /// 履歴のクエリで再検索する（submit_search と同じ。元のエントリはそのまま残る）
    pub fn search_again(&self, query: &str) -> Result<HistoryEntry, HistoryError> {
        self.submit_search(query)
    }

    /// 番号または ID で指定した履歴のクエリで再検索する
    pub fn search_again_ref(&self, target: &EntryRef) -> Result<HistoryEntry, HistoryError> {
        let query = self.resolve(target)?.query;
        self.search_again(&query)
    }

    /// ID の履歴を削除する（無ければ何もしない）。削除の有無にかかわらず通知する
    pub fn delete_entry(&self, id: &EntryId) -> Result<bool, HistoryError> {
        let _pass = self.enter_gate("delete")?;
        let (removed, snapshot) = {
            let mut history = self.history.lock();
            let removed = history.remove(id).is_some();
            (removed, history.clone())
        };
        self.persist(&snapshot, "delete");
        self.ports.notifier.notify(&Notification::entry_deleted());
        let _ = self.ports.log.log(
            &LogRecord::new(LogLevel::Info, "history entry deleted")
                .layer("usecase")
                .kind("history")
                .field("entry_id", id.as_str())
                .field("removed", removed),
        );
        Ok(removed)
    }

    /// 全削除（何度呼んでも空になる）
    pub fn clear_all(&self) -> Result<(), HistoryError> {
        let _pass = self.enter_gate("clear")?;
        let snapshot = {
            let mut history = self.history.lock();
            history.clear();
            history.clone()
        };
        self.persist(&snapshot, "clear");
        self.ports.notifier.notify(&Notification::history_cleared());
        let _ = self.ports.log.log(
            &LogRecord::new(LogLevel::Info, "history cleared")
                .layer("usecase")
                .kind("history"),
        );
        Ok(())
    }

    /// 番号（1 始まり）または ID で引く
    pub fn resolve(&self, target: &EntryRef) -> Result<HistoryEntry, HistoryError> {
        self.history
            .lock()
            .resolve(target)
            .cloned()
            .ok_or_else(|| HistoryError::NotFound(target.to_string()))
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.history.lock().entries().to_vec()
    }

    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst)
    }

    /// 先に実行中・待機中の操作があれば debug に残してからゲートに入る
    fn enter_gate(&self, operation: &str) -> Result<GatePass<'_>, HistoryError> {
        let ahead = self.gate.pending();
        if ahead > 0 {
            self.debug("history operation waiting", "history", |r| {
                r.field("operation", operation).field("ahead", ahead)
            });
        }
        self.gate.enter()
    }

    /// リスト全体を書き戻す。失敗はログのみ（メモリ上の状態はそのまま）
    fn persist(&self, list: &HistoryList, operation: &str) {
        let result = encode_history(list)
            .and_then(|blob| self.ports.store.set(HISTORY_KEY, &blob));
        if let Err(e) = result {
            let _ = self.ports.log.log(
                &LogRecord::new(LogLevel::Warn, "failed to persist history")
                    .layer("usecase")
                    .kind("persistence")
                    .field("operation", operation)
                    .field("error", e.to_string()),
            );
        }
    }

    fn debug(&self, message: &str, kind: &str, with: impl FnOnce(LogRecord) -> LogRecord) {
        let record = with(
            LogRecord::new(LogLevel::Debug, message)
                .layer("usecase")
                .kind(kind),
        );
        let _ = self.ports.log.log(&record);
    }
}

impl HistoryIntents for HistoryManager {
    fn submit(&self, text: &str) -> Result<HistoryEntry, HistoryError> {
        self.submit_search(text)
    }

    fn search_again(&self, query: &str) -> Result<HistoryEntry, HistoryError> {
        HistoryManager::search_again(self, query)
    }

    fn delete(&self, id: &EntryId) -> Result<bool, HistoryError> {
        self.delete_entry(id)
    }

    fn clear_all(&self) -> Result<(), HistoryError> {
        HistoryManager::clear_all(self)
    }

    fn state(&self) -> HistoryState {
        HistoryState {
            entries: self.entries(),
            is_searching: self.is_searching(),
        }
    }
}

fn timestamp_from_ms(ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}

fn load_history(store: &dyn KeyValueStore, log: &dyn Log) -> HistoryList {
    let raw = match store.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return HistoryList::new(),
        Err(e) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Warn, "failed to read stored history; starting empty")
                    .layer("usecase")
                    .kind("persistence")
                    .field("error", e.to_string()),
            );
            return HistoryList::new();
        }
    };

    match decode_history(&raw) {
        Ok(decoded) => {
            if decoded.migrated_from_legacy {
                let _ = log.log(
                    &LogRecord::new(LogLevel::Info, "migrated unversioned stored history")
                        .layer("usecase")
                        .kind("persistence")
                        .field("entries", decoded.list.len()),
                );
            }
            if decoded.dropped_duplicates > 0 {
                let _ = log.log(
                    &LogRecord::new(LogLevel::Warn, "dropped history entries with duplicate ids")
                        .layer("usecase")
                        .kind("persistence")
                        .field("dropped", decoded.dropped_duplicates),
                );
            }
            decoded.list
        }
        Err(e) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Warn, "discarding unreadable stored history")
                    .layer("usecase")
                    .kind("persistence")
                    .field("error", e.to_string()),
            );
            HistoryList::new()
        }
    }
}
