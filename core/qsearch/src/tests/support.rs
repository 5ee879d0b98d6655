//! テスト用のポート実装（メモリ上のストア・記録するだけのブラウザ／通知／ログ）

use crate::adapter::ConsoleInput;
use crate::domain::Notification;
use crate::ports::outbound::{KeyValueStore, Notifier, UrlLauncher};
use crate::usecase::{HistoryManager, HistoryPorts, ManagerSettings, OverlapPolicy};
use common::domain::EntryId;
use common::error::Error;
use common::ports::outbound::{Clock, IdGenerator, Log, LogLevel, LogRecord};
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// メモリ上のキー・値ストア。読み書きの失敗を切り替えられ、書き込みを止めることもできる
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
    held: Mutex<bool>,
    released: Condvar,
}

impl MemoryStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.values.lock().insert(key.to_string(), value.to_string());
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// set に入った回数（止まっている呼び出しも含む）
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// release_writes() まで set を止める
    pub fn hold_writes(&self) {
        *self.held.lock() = true;
    }

    pub fn release_writes(&self) {
        *self.held.lock() = false;
        self.released.notify_all();
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::io_msg("store unavailable"));
        }
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        {
            let mut held = self.held.lock();
            while *held {
                self.released.wait(&mut held);
            }
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::io_msg("disk full"));
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 開いた URL を記録する。失敗させる・解放されるまで止めることもできる
#[derive(Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
    started: AtomicUsize,
    held: Mutex<bool>,
    released: Condvar,
}

impl RecordingLauncher {
    pub fn failing(reason: &str) -> Self {
        let launcher = Self::default();
        *launcher.failure.lock() = Some(reason.to_string());
        launcher
    }

    /// release() まで open を止める
    pub fn held() -> Self {
        let launcher = Self::default();
        *launcher.held.lock() = true;
        launcher
    }

    pub fn release(&self) {
        *self.held.lock() = false;
        self.released.notify_all();
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    /// open に入った回数（止まっている呼び出しも含む）
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl UrlLauncher for RecordingLauncher {
    fn open(&self, url: &str) -> Result<(), Error> {
        self.started.fetch_add(1, Ordering::SeqCst);
        {
            let mut held = self.held.lock();
            while *held {
                self.released.wait(&mut held);
            }
        }
        if let Some(reason) = self.failure.lock().clone() {
            return Err(Error::system(reason));
        }
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.sent.lock().push(notification.clone());
    }
}

#[derive(Default)]
pub struct RecordingLog {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLog {
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }
}

impl Log for RecordingLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// 呼ぶたびに 1 秒進む時計（2024-03-01T00:00:00Z から）
pub struct StepClock(AtomicU64);

impl Default for StepClock {
    fn default() -> Self {
        Self(AtomicU64::new(1_709_251_200_000))
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u64 {
        self.0.fetch_add(1_000, Ordering::SeqCst)
    }
}

/// "id000001", "id000002", ... を順に返す
#[derive(Default)]
pub struct SeqIdGenerator(AtomicU64);

impl IdGenerator for SeqIdGenerator {
    fn next_id(&self) -> EntryId {
        let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        EntryId::new(format!("id{:06}", n))
    }
}

/// 常に同じ ID を返す
pub struct ConstIdGenerator(pub &'static str);

impl IdGenerator for ConstIdGenerator {
    fn next_id(&self) -> EntryId {
        EntryId::new(self.0)
    }
}

/// テスト用のポート一式（各フェイクへの参照を保持する）
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub launcher: Arc<RecordingLauncher>,
    pub notifier: Arc<RecordingNotifier>,
    pub input: Arc<ConsoleInput>,
    pub log: Arc<RecordingLog>,
    pub id_gen: Arc<dyn IdGenerator>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(MemoryStore::default(), RecordingLauncher::default())
    }
}

impl Harness {
    pub fn new(store: MemoryStore, launcher: RecordingLauncher) -> Self {
        Self {
            store: Arc::new(store),
            launcher: Arc::new(launcher),
            notifier: Arc::new(RecordingNotifier::default()),
            input: Arc::new(ConsoleInput::new()),
            log: Arc::new(RecordingLog::default()),
            id_gen: Arc::new(SeqIdGenerator::default()),
        }
    }

    pub fn ports(&self) -> HistoryPorts {
        HistoryPorts {
            store: self.store.clone(),
            launcher: self.launcher.clone(),
            notifier: self.notifier.clone(),
            input: self.input.clone(),
            id_gen: Arc::clone(&self.id_gen),
            clock: Arc::new(StepClock::default()),
            log: self.log.clone(),
        }
    }

    pub fn manager(&self) -> HistoryManager {
        self.manager_with(OverlapPolicy::Queue)
    }

    pub fn manager_with(&self, overlap_policy: OverlapPolicy) -> HistoryManager {
        HistoryManager::load(
            self.ports(),
            ManagerSettings {
                overlap_policy,
                ..Default::default()
            },
        )
    }
}

pub fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(1));
    }
}
