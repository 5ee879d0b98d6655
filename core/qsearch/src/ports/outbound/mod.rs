//! Outbound ポート: アプリが外界（ストア・ブラウザ・通知・入力欄）を使うための trait

pub mod input_surface;
pub mod interrupt_checker;
pub mod key_value_store;
pub mod notifier;
pub mod url_launcher;

pub use input_surface::InputSurface;
pub use interrupt_checker::InterruptChecker;
pub use key_value_store::KeyValueStore;
pub use notifier::Notifier;
pub use url_launcher::UrlLauncher;
