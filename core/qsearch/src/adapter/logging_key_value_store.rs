//! ストアの読み書きをログに記録する KeyValueStore のラッパ

use crate::ports::outbound::KeyValueStore;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct LoggingKeyValueStore {
    inner: Arc<dyn KeyValueStore>,
    log: Arc<dyn Log>,
}

impl LoggingKeyValueStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, log: Arc<dyn Log>) -> Self {
        Self { inner, log }
    }

    fn record<T>(&self, operation: &str, key: &str, bytes: Option<usize>, result: &Result<T, Error>) {
        let mut rec = match result {
            Ok(_) => LogRecord::new(LogLevel::Debug, "store access"),
            Err(e) => LogRecord::new(LogLevel::Debug, "store access failed").field("error", e.to_string()),
        }
        .layer("adapter")
        .kind("persistence")
        .field("operation", operation)
        .field("key", key);
        if let Some(n) = bytes {
            rec = rec.field("bytes", n);
        }
        let _ = self.log.log(&rec);
    }
}

impl KeyValueStore for LoggingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let out = self.inner.get(key);
        let bytes = out.as_ref().ok().and_then(|v| v.as_ref().map(|s| s.len()));
        self.record("get", key, bytes, &out);
        out
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let out = self.inner.set(key, value);
        self.record("set", key, Some(value.len()), &out);
        out
    }
}
