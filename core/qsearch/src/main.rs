mod adapter;
mod cli;
mod domain;
mod ports;
mod shell;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use adapter::{NoopInterruptChecker, SigintChecker};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::{Command, HistoryEntry, HistoryError};
use ports::inbound::{HistoryIntents, UseCaseRunner};
use ports::outbound::InterruptChecker;
use shell::{write_history, InteractiveShell};
use wiring::{wire_qsearch, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let command = config_to_command(&config);
        let manager = &self.app.manager;

        match command {
            Command::Help => {
                print_help();
                Ok(0)
            }
            Command::Shell => self.run_shell(),
            Command::Search { query } => search_exit_code(manager.submit_search(&query)),
            Command::Again { target } => search_exit_code(manager.search_again_ref(&target)),
            Command::List => {
                let stdout = std::io::stdout();
                write_history(&mut stdout.lock(), &manager.entries())?;
                Ok(0)
            }
            Command::Delete { target } => {
                let entry = manager.resolve(&target)?;
                manager.delete_entry(&entry.id)?;
                Ok(0)
            }
            Command::Clear => {
                manager.clear_all()?;
                Ok(0)
            }
            Command::Unknown(name) => Err(Error::invalid_argument(format!(
                "Command '{}' is not implemented.",
                name
            ))),
        }
    }
}

impl Runner {
    fn run_shell(&self) -> Result<i32, Error> {
        let in_operation = Arc::new(AtomicBool::new(false));
        let interrupt: Arc<dyn InterruptChecker> =
            match SigintChecker::install(Arc::clone(&in_operation)) {
                Ok(checker) => Arc::new(checker),
                Err(e) => {
                    let _ = self.app.logger.log(
                        &LogRecord::new(LogLevel::Warn, "failed to install SIGINT handler")
                            .layer("main")
                            .kind("lifecycle")
                            .field("error", e.to_string()),
                    );
                    Arc::new(NoopInterruptChecker)
                }
            };
        let intents: Arc<dyn HistoryIntents> = self.app.manager.clone();
        let shell = InteractiveShell::new(
            intents,
            Arc::clone(&self.app.input),
            interrupt,
            in_operation,
        );
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        shell.run(stdin.lock(), &mut stdout.lock())
    }
}

/// 検索系コマンドの終了コード。ブラウザ起動の失敗は通知済みなので 1 で終える
fn search_exit_code(result: Result<HistoryEntry, HistoryError>) -> Result<i32, Error> {
    match result {
        Ok(_) => Ok(0),
        Err(HistoryError::Launch(_)) => Ok(1),
        Err(e) => Err(e.into()),
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("qsearch: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
        ParseOutcome::Config(config) => config,
    };
    // ヘルプは設定やホームディレクトリが壊れていても表示する
    if config.help {
        print_help();
        return Ok(0);
    }

    let app = wire_qsearch(&config)?;
    let logger = Arc::clone(&app.logger);
    let command_name = config
        .command_name
        .clone()
        .unwrap_or_else(|| "shell".to_string());
    let _ = logger.log(
        &LogRecord::new(LogLevel::Info, "qsearch started")
            .layer("main")
            .kind("lifecycle")
            .field("command", command_name.as_str())
            .field("home_dir", app.home_dir.display().to_string()),
    );

    let runner = Runner { app };
    let result = runner.run(config);

    let record = match &result {
        Ok(code) => LogRecord::new(LogLevel::Info, "qsearch finished").field("exit_code", *code),
        Err(e) => LogRecord::new(LogLevel::Error, "qsearch failed")
            .field("exit_code", e.exit_code())
            .field("error", e.to_string()),
    };
    let _ = logger.log(
        &record
            .layer("main")
            .kind("lifecycle")
            .field("command", command_name.as_str()),
    );
    result
}

fn print_usage() {
    eprintln!("Usage: qsearch [-h] [-d|--home-dir directory] [-e|--engine url] [-v] [<command> [args...]]");
}

fn print_help() {
    println!("Usage: qsearch [-h] [-d|--home-dir directory] [-e|--engine url] [-v] [<command> [args...]]");
    println!("  -h, --help            Display this help message.");
    println!("  -d, --home-dir        Directory for history, config and logs (overrides QSEARCH_HOME).");
    println!("  -e, --engine          Search engine base URL (overrides search_engine_url in config.json).");
    println!("  -v, --verbose         Write debug records to the log file.");
    println!("  --generate <shell>    Generate shell completion script (bash, zsh, fish). Source the output to enable tab completion.");
    println!("  <command>             Command to execute. Omit to start the interactive shell.");
    println!();
    println!("Environment:");
    println!("  QSEARCH_HOME       Home directory. Default: $XDG_DATA_HOME/qsearch or ~/.local/share/qsearch.");
    println!("  QSEARCH_LOG_FILE   Log file (JSONL). Default: <home>/log/qsearch.jsonl.");
    println!();
    println!("Commands:");
    println!("  search <words...>  Open a search for the words (joined by spaces) and add it to the history.");
    println!("  again <n|id>       Search again for a history entry (n = position in `list`, 1 = newest).");
    println!("  list               List the search history, newest first.");
    println!("  delete <n|id>      Remove one history entry.");
    println!("  clear              Remove every history entry.");
    println!("  shell              Start the interactive shell (default).");
}
