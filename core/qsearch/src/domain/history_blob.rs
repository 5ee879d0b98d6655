//! 永続化用の履歴表現（キー・値ストアに保存する文字列）
//!
//! 形式: `{"version": 1, "entries": [{"id", "query", "timestamp"}, ...]}`。
//! バージョン無しの旧形式（エントリの JSON 配列そのもの）も読み込み、version 1 へ移行する。

use crate::domain::{HistoryEntry, HistoryError, HistoryList};
use common::error::Error;
use serde::{Deserialize, Serialize};

/// 現在の保存形式のバージョン
pub const HISTORY_BLOB_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct HistoryBlob {
    version: u32,
    entries: Vec<HistoryEntry>,
}

#[derive(Serialize)]
struct HistoryBlobRef<'a> {
    version: u32,
    entries: &'a [HistoryEntry],
}

/// 読み込み結果（移行・修復があったかを呼び出し側がログに残せるようにする）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHistory {
    pub list: HistoryList,
    /// バージョン無しの旧形式から読み込んだ
    pub migrated_from_legacy: bool,
    /// ID 重複で捨てたエントリ数
    pub dropped_duplicates: usize,
}

/// リスト全体を保存用文字列にする
pub fn encode_history(list: &HistoryList) -> Result<String, Error> {
    serde_json::to_string(&HistoryBlobRef {
        version: HISTORY_BLOB_VERSION,
        entries: list.entries(),
    })
    .map_err(|e| Error::json(e.to_string()))
}

/// 保存用文字列から復元する
pub fn decode_history(raw: &str) -> Result<DecodedHistory, HistoryError> {
    // まず現行スキーマでパース
    let (entries, migrated_from_legacy) = match serde_json::from_str::<HistoryBlob>(raw) {
        Ok(blob) => {
            if blob.version > HISTORY_BLOB_VERSION {
                return Err(HistoryError::Corrupt(format!(
                    "unsupported history version {} (supported: {})",
                    blob.version, HISTORY_BLOB_VERSION
                )));
            }
            (blob.entries, false)
        }
        Err(current_err) => {
            // 互換性のため、バージョン無しの配列形式も受け入れる
            let entries: Vec<HistoryEntry> = serde_json::from_str(raw)
                .map_err(|_| HistoryError::Corrupt(current_err.to_string()))?;
            (entries, true)
        }
    };

    if let Some(empty) = entries.iter().find(|e| e.query.is_empty()) {
        return Err(HistoryError::Corrupt(format!(
            "entry '{}' has an empty query",
            empty.id
        )));
    }

    let (list, dropped_duplicates) = HistoryList::from_entries(entries);
    Ok(DecodedHistory {
        list,
        migrated_from_legacy,
        dropped_duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use common::domain::EntryId;

    fn ts(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn sample() -> HistoryList {
        let mut list = HistoryList::new();
        list.prepend(HistoryEntry::new(EntryId::new("00000001"), "cats", ts(1_700_000_000_123)))
            .unwrap();
        list.prepend(HistoryEntry::new(EntryId::new("00000002"), "dogs & more", ts(1_700_000_005_000)))
            .unwrap();
        list
    }

    #[test]
    fn test_encode_is_versioned() {
        let raw = encode_history(&sample()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["version"], 1);
        assert_eq!(v["entries"][0]["query"], "dogs & more");
        assert_eq!(v["entries"][0]["id"], "00000002");
        assert!(v["entries"][0]["timestamp"].is_string());
    }

    #[test]
    fn test_encode_then_decode_is_equal() {
        let list = sample();
        let decoded = decode_history(&encode_history(&list).unwrap()).unwrap();
        assert_eq!(decoded.list, list);
        assert!(!decoded.migrated_from_legacy);
        assert_eq!(decoded.dropped_duplicates, 0);
    }

    #[test]
    fn test_decode_legacy_array() {
        let raw = r#"[
            {"id": "k1", "query": "cats", "timestamp": "2024-03-01T10:00:00.000Z"},
            {"id": "k0", "query": "dogs", "timestamp": "2024-02-29T09:00:00.000Z"}
        ]"#;
        let decoded = decode_history(raw).unwrap();
        assert!(decoded.migrated_from_legacy);
        assert_eq!(decoded.list.len(), 2);
        assert_eq!(decoded.list.entries()[0].query, "cats");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_history("not json"), Err(HistoryError::Corrupt(_))));
        assert!(matches!(decode_history("{\"foo\":1}"), Err(HistoryError::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let raw = r#"{"version": 2, "entries": []}"#;
        let err = decode_history(raw).unwrap_err();
        assert!(err.to_string().contains("unsupported history version 2"));
    }

    #[test]
    fn test_decode_rejects_empty_query() {
        let raw = r#"{"version": 1, "entries": [{"id": "a", "query": "", "timestamp": "2024-03-01T10:00:00Z"}]}"#;
        assert!(matches!(decode_history(raw), Err(HistoryError::Corrupt(_))));
    }

    #[test]
    fn test_decode_drops_duplicate_ids() {
        let raw = r#"{"version": 1, "entries": [
            {"id": "a", "query": "x", "timestamp": "2024-03-01T10:00:00Z"},
            {"id": "a", "query": "y", "timestamp": "2024-03-01T09:00:00Z"}
        ]}"#;
        let decoded = decode_history(raw).unwrap();
        assert_eq!(decoded.dropped_duplicates, 1);
        assert_eq!(decoded.list.entries()[0].query, "x");
    }
}
