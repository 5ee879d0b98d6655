//! 読み書きに制限時間を付ける KeyValueStore のラッパ
//!
//! 時間切れは Error::Timeout（呼び出し側では読み書き失敗として扱う）。

use crate::ports::outbound::KeyValueStore;
use common::adapter::run_with_timeout;
use common::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub struct TimeoutKeyValueStore {
    inner: Arc<dyn KeyValueStore>,
    timeout: Duration,
}

impl TimeoutKeyValueStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl KeyValueStore for TimeoutKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        run_with_timeout("store-get", self.timeout, move || inner.get(&key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        let value = value.to_string();
        run_with_timeout("store-set", self.timeout, move || inner.set(&key, &value))
    }
}
