pub mod history_manager;
pub mod mutation_gate;

pub use history_manager::{HistoryManager, HistoryPorts, ManagerSettings};
pub use mutation_gate::OverlapPolicy;
