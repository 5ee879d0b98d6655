//! アダプター（ポートの標準実装）

pub mod browser_launcher;
pub mod config;
pub mod console_input;
pub mod console_notifier;
pub mod file_key_value_store;
pub mod logging_key_value_store;
pub mod sigint_checker;
pub mod timeout_key_value_store;

pub use browser_launcher::BrowserLauncher;
pub use config::load_app_config;
pub use console_input::ConsoleInput;
pub use console_notifier::ConsoleNotifier;
pub use file_key_value_store::FileKeyValueStore;
pub use logging_key_value_store::LoggingKeyValueStore;
pub use sigint_checker::{NoopInterruptChecker, SigintChecker};
pub use timeout_key_value_store::TimeoutKeyValueStore;
