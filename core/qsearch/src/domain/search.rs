//! 検索クエリと検索エンジン URL の組み立て
//!
//! クエリは 1 つのクエリ文字列パラメータ `q` として percent-encode し、ベース URL に付ける。

use crate::domain::HistoryError;
use common::error::Error;

/// 既定の検索エンジン
pub const DEFAULT_SEARCH_ENGINE_URL: &str = "https://www.google.com/search";

/// 空でないことが保証された検索クエリ（前後の空白はそのまま保持する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// 入力欄の文字列をそのまま検証する。空文字列のみ拒否（trim はしない）
    pub fn parse(raw: &str) -> Result<Self, HistoryError> {
        if raw.is_empty() {
            return Err(HistoryError::empty_query());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 検索エンジンのベース URL（クエリ・フラグメントを含まない http(s) URL）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngine {
    base_url: String,
}

impl SearchEngine {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = base_url.trim();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::invalid_argument(format!(
                "search engine URL must start with http:// or https://: '{}'",
                base_url
            )));
        }
        if base_url.contains('?') || base_url.contains('#') {
            return Err(Error::invalid_argument(format!(
                "search engine URL must not contain a query or fragment: '{}'",
                base_url
            )));
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    /// `<base>?q=<encoded query>`
    pub fn url_for(&self, query: &SearchQuery) -> String {
        format!("{}?q={}", self.base_url, encode_uri_component(query.as_str()))
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_ENGINE_URL.to_string(),
        }
    }
}

/// encodeURIComponent 相当の percent-encoding
///
/// 非予約文字 `A-Z a-z 0-9 - _ . ! ~ * ' ( )` 以外の UTF-8 バイトを `%XX`（大文字 16 進）にする。
pub fn encode_uri_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len() + 8);
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(b)),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0F) as usize]));
            }
        }
    }
    out
}
