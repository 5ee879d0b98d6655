//! EntryId を生成する IdGenerator の標準実装（Clock + シーケンス）
//!
//! 形式: base62(0-9,A-Z,a-z) 8 文字（左 0 埋め）。値 = (ms since 2020-01-01)<<8 | seq。8 文字の間は辞書順＝数値順＝生成順。
//! 同一 ms 内で seq(0..255) を使い切った場合は次の ms の値へ繰り上げる（時刻部が実時刻より先行するだけで一意性は保たれる）。
//! 値が 62^8 以上（2047 年頃以降）になったら桁を増やす。切り捨てないので一意性は保たれる。

use crate::domain::EntryId;
use crate::ports::outbound::{Clock, IdGenerator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const EPOCH_MS: u64 = 1577836800000; // 2020-01-01 00:00:00 UTC
const SEQ_BITS: u64 = 8;
const BASE: u64 = 62;
const WIDTH: usize = 8;

/// 0-9, A-Z, a-z の順で辞書順＝数値順になるbase62
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Clock + 単調増加シーケンスで EntryId を生成する標準実装
pub struct StdIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl StdIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for StdIdGenerator {
    fn next_id(&self) -> EntryId {
        let ms_rel = self.clock.now_ms().saturating_sub(EPOCH_MS);
        let base = ms_rel << SEQ_BITS;

        let mut prev = self.last.load(Ordering::SeqCst);
        loop {
            let next = base.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return EntryId::new(to_base62(next)),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// 最低 WIDTH 桁。収まらない値は桁を増やす
fn to_base62(mut n: u64) -> String {
    let mut digits = Vec::with_capacity(WIDTH + 3);
    while n > 0 || digits.len() < WIDTH {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }
    digits.iter().rev().map(|&b| b as char).collect()
}
