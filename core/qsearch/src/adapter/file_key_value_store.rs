//! JSON ファイル 1 つにキー・値を保存する KeyValueStore 実装
//!
//! ファイル形式: `{"<key>": "<value>", ...}`。書き込みは一時ファイル + rename で置き換える。

use crate::ports::outbound::KeyValueStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FileKeyValueStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let s = self.fs.read_to_string(&self.path)?;
        serde_json::from_str(&s)
            .map_err(|e| Error::json(format!("parse {}: {}", self.path.display(), e)))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.write_lock.lock();
        // 壊れたストアは読み直さずに作り直す（残りのキーは失われる）
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&map).map_err(|e| Error::json(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let tmp = self.tmp_path();
        self.fs.write(&tmp, &json)?;
        if let Err(e) = self.fs.rename(&tmp, &self.path) {
            let _ = self.fs.remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }
}
