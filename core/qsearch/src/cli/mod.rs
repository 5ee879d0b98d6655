//! CLI 境界: 引数解析と補完スクリプト生成

pub mod args;

pub use args::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
