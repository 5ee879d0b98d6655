//! 履歴を変更する操作を 1 つずつ実行させるゲート
//!
//! チケット方式: 入場時に番号を取り、呼ばれた順（FIFO）に 1 件ずつ通す。
//! OverlapPolicy::Reject では、実行中・待機中の操作があれば即座に Busy を返す。

use crate::domain::HistoryError;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

/// 変更操作が重なったときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// 先の操作が終わるまで待ってから実行する
    #[default]
    Queue,
    /// 待たずに Busy で断る
    Reject,
}

#[derive(Debug, Default)]
struct Tickets {
    next_ticket: u64,
    now_serving: u64,
}

/// 変更操作の直列化ゲート
#[derive(Debug)]
pub struct MutationGate {
    policy: OverlapPolicy,
    tickets: Mutex<Tickets>,
    turn: Condvar,
}

impl MutationGate {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            tickets: Mutex::new(Tickets::default()),
            turn: Condvar::new(),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// 自分の番まで待って入場する。返した GatePass を drop すると次の操作へ順番が移る
    pub fn enter(&self) -> Result<GatePass<'_>, HistoryError> {
        let mut tickets = self.tickets.lock();
        if self.policy == OverlapPolicy::Reject && tickets.next_ticket != tickets.now_serving {
            return Err(HistoryError::Busy);
        }
        let ticket = tickets.next_ticket;
        tickets.next_ticket += 1;
        while tickets.now_serving != ticket {
            self.turn.wait(&mut tickets);
        }
        Ok(GatePass { gate: self })
    }

    /// 実行中 + 待機中の操作数
    pub fn pending(&self) -> u64 {
        let tickets = self.tickets.lock();
        tickets.next_ticket - tickets.now_serving
    }
}

/// 入場中であることを表す。drop で退場（panic で巻き戻った場合も）
#[must_use = "the gate is released as soon as the pass is dropped"]
pub struct GatePass<'a> {
    gate: &'a MutationGate,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        let mut tickets = self.gate.tickets.lock();
        tickets.now_serving += 1;
        drop(tickets);
        self.gate.turn.notify_all();
    }
}
