//! 検索履歴のドメイン型
//!
//! HistoryList は新しいものが先頭（index 0）。ID の重複を許さない。

use crate::domain::HistoryError;
use chrono::{DateTime, Utc};
use common::domain::EntryId;
use serde::{Deserialize, Serialize};

/// ID の文字数（StdIdGenerator の固定長）
pub const ENTRY_ID_LEN: usize = 8;

/// 過去の検索 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(id: EntryId, query: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            query: query.into(),
            timestamp,
        }
    }
}

/// 履歴の参照方法（一覧表示の 1 始まりの番号、または ID）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRef {
    Index(usize),
    Id(EntryId),
}

impl EntryRef {
    /// ID 長でない数字列は番号、それ以外は ID として扱う
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.len() != ENTRY_ID_LEN && !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = s.parse::<usize>() {
                return EntryRef::Index(n);
            }
        }
        EntryRef::Id(EntryId::new(s))
    }

    /// 新しい順の並びから引く（番号は 1 始まり）
    ///
    /// 範囲外の番号は数字だけの ID（旧形式の ms 値など）としても探す。
    pub fn resolve_in<'a>(&self, entries: &'a [HistoryEntry]) -> Option<&'a HistoryEntry> {
        match self {
            EntryRef::Index(n) => n
                .checked_sub(1)
                .and_then(|i| entries.get(i))
                .or_else(|| {
                    let id = n.to_string();
                    entries.iter().find(|e| e.id.as_str() == id)
                }),
            EntryRef::Id(id) => entries.iter().find(|e| &e.id == id),
        }
    }
}

impl std::fmt::Display for EntryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryRef::Index(n) => write!(f, "#{}", n),
            EntryRef::Id(id) => id.fmt(f),
        }
    }
}

/// 新しい順の履歴リスト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryList {
    entries: Vec<HistoryEntry>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの並びから作る。ID が重複した場合は先に現れたものを残し、捨てた件数を返す
    pub fn from_entries(entries: Vec<HistoryEntry>) -> (Self, usize) {
        let total = entries.len();
        let mut seen = std::collections::HashSet::with_capacity(total);
        let entries: Vec<HistoryEntry> = entries
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        let dropped = total - entries.len();
        (Self { entries }, dropped)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find(&self, id: &EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// 番号（1 始まり）または ID で引く
    pub fn resolve(&self, target: &EntryRef) -> Option<&HistoryEntry> {
        target.resolve_in(&self.entries)
    }

    /// 先頭に追加する
    pub fn prepend(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        if self.find(&entry.id).is_some() {
            return Err(HistoryError::DuplicateId(entry.id));
        }
        self.entries.insert(0, entry);
        Ok(())
    }

    /// ID が一致する 1 件を取り除く（無ければ None。残りの順序は保つ）
    pub fn remove(&mut self, id: &EntryId) -> Option<HistoryEntry> {
        let pos = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// UI シェルが描画する状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    pub entries: Vec<HistoryEntry>,
    pub is_searching: bool,
}
