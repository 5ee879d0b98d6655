//! EntryId 生成 Outbound ポート
//!
//! usecase は IdGenerator を注入し、テストでは連番を返す実装を渡せる。

use crate::domain::EntryId;

/// EntryId を生成する抽象（Outbound ポート）
pub trait IdGenerator: Send + Sync {
    /// 生成のたびに異なる ID を返す（同一プロセス内で一意）
    fn next_id(&self) -> EntryId;
}
