//! Ports & Adapters のポート定義
//!
//! - inbound: UI シェル（CLI / 対話シェル）がアプリを呼び出すインターフェース
//! - outbound: 永続化・ブラウザ起動・通知・入力欄への合図の trait（common の Clock / IdGenerator / Log も利用）

pub mod inbound;
pub mod outbound;
