//! 配線: 標準アダプタで HistoryManager と対話シェルの部品を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{
    FileJsonLog, LevelFilterLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem, StdIdGenerator,
};
use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem, Log, LogLevel};

use crate::adapter::{
    load_app_config, BrowserLauncher, ConsoleInput, ConsoleNotifier, FileKeyValueStore,
    LoggingKeyValueStore, TimeoutKeyValueStore,
};
use crate::cli::Config;
use crate::domain::SearchEngine;
use crate::ports::outbound::KeyValueStore;
use crate::usecase::{HistoryManager, HistoryPorts, ManagerSettings};

/// 配線で組み立てた部品（main の Command ディスパッチで利用）
pub struct App {
    pub manager: Arc<HistoryManager>,
    /// 対話シェルが行を置く入力欄（HistoryManager には InputSurface として渡している）
    pub input: Arc<ConsoleInput>,
    /// 構造化ログ（ファイルへ JSONL）。通知やエラー表示とは別
    pub logger: Arc<dyn Log>,
    pub home_dir: HomeDir,
}

/// ポートを差し替えて App を組み立てる（テストでも利用）
pub fn assemble(
    ports: HistoryPorts,
    settings: ManagerSettings,
    input: Arc<ConsoleInput>,
    home_dir: HomeDir,
) -> App {
    let logger = Arc::clone(&ports.log);
    let manager = Arc::new(HistoryManager::load(ports, settings));
    App {
        manager,
        input,
        logger,
        home_dir,
    }
}

/// 配線: 標準アダプタで App を組み立てる
///
/// ホームディレクトリは -d > QSEARCH_HOME > XDG_DATA_HOME > HOME の順。
/// 検索エンジンは -e > config.json > 既定値。
pub fn wire_qsearch(config: &Config) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let home_dir = match &config.home_dir {
        Some(dir) => HomeDir::new(PathBuf::from(dir)),
        None => env_resolver.resolve_home_dir()?,
    };

    let app_config = load_app_config(fs.as_ref(), &home_dir)?;
    let engine_url = config
        .engine
        .as_deref()
        .unwrap_or(app_config.search_engine_url.as_str());
    let settings = ManagerSettings {
        engine: SearchEngine::new(engine_url)?,
        overlap_policy: app_config.overlap_policy,
    };

    let logger = wire_logger(
        Arc::clone(&fs),
        env_resolver.as_ref(),
        &home_dir,
        config.verbose,
    );

    let file_store: Arc<dyn KeyValueStore> =
        Arc::new(FileKeyValueStore::new(Arc::clone(&fs), home_dir.store_path()));
    let logged_store: Arc<dyn KeyValueStore> =
        Arc::new(LoggingKeyValueStore::new(file_store, Arc::clone(&logger)));
    let store: Arc<dyn KeyValueStore> = Arc::new(TimeoutKeyValueStore::new(
        logged_store,
        app_config.persistence_timeout(),
    ));

    let input = Arc::new(ConsoleInput::new());
    let ports = HistoryPorts {
        store,
        launcher: Arc::new(BrowserLauncher::new(app_config.launch_timeout())),
        notifier: Arc::new(ConsoleNotifier),
        input: Arc::clone(&input) as Arc<dyn crate::ports::outbound::InputSurface>,
        id_gen: Arc::new(StdIdGenerator::new(Arc::new(StdClock))),
        clock: Arc::new(StdClock),
        log: logger,
    };
    Ok(assemble(ports, settings, input, home_dir))
}

/// QSEARCH_LOG_FILE > <home>/log/qsearch.jsonl。verbose でなければ debug は捨てる
fn wire_logger(
    fs: Arc<dyn FileSystem>,
    env_resolver: &dyn EnvResolver,
    home_dir: &HomeDir,
    verbose: bool,
) -> Arc<dyn Log> {
    let path = env_resolver
        .log_file_override()
        .unwrap_or_else(|| home_dir.log_path());
    let file_log: Arc<dyn Log> = match path.parent() {
        Some(dir) if fs.create_dir_all(dir).is_err() => Arc::new(NoopLog),
        _ => Arc::new(FileJsonLog::new(fs, path)),
    };
    let max_level = if verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    Arc::new(LevelFilterLog::new(file_log, max_level))
}
