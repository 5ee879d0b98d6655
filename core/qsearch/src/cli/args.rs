use crate::domain::command::Command;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;

/// CLI から受け取った生の設定（command は文字列のまま保持）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -d / --home-dir: 履歴・設定・ログの置き場所（QSEARCH_HOME より優先）
    pub home_dir: Option<String>,
    /// -e / --engine: 検索エンジンのベース URL（config.json より優先）
    pub engine: Option<String>,
    /// -v / --verbose: debug レベルのログもファイルに出す
    pub verbose: bool,
    /// コマンド名（None の場合は Shell）
    pub command_name: Option<String>,
    pub command_args: Vec<String>,
}

/// 解析結果: 通常の Config または補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            clap::Arg::new("home-dir")
                .short('d')
                .long("home-dir")
                .value_name("directory")
                .help("Directory for history, config and logs (overrides QSEARCH_HOME)")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("engine")
                .short('e')
                .long("engine")
                .value_name("url")
                .help("Search engine base URL, e.g. https://duckduckgo.com/")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Write debug records to the log file")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn target_arg() -> clap::Arg {
    clap::Arg::new("target")
        .value_name("n|id")
        .help("Position in `qsearch list` (1 = newest) or entry id")
        .required(true)
        .num_args(1)
}

/// サブコマンド（-h はグローバル引数で受けるため自動の help フラグは付けない）
fn sub(name: &'static str) -> clap::Command {
    clap::Command::new(name).disable_help_flag(true)
}

fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new("qsearch")
            .about("Open web searches in the system browser and keep a local search history")
            .subcommand_required(false)
            .disable_help_subcommand(true)
            .subcommand(sub("shell").about("Start the interactive shell (default)"))
            .subcommand(sub("help").about("Display this help message"))
            .subcommand(
                sub("search")
                    .about("Search for the given words in the browser")
                    .arg(
                        clap::Arg::new("words")
                            .value_name("words")
                            .num_args(0..)
                            .trailing_var_arg(true)
                            .allow_hyphen_values(true),
                    ),
            )
            .subcommand(
                sub("again")
                    .about("Search again for a query from the history")
                    .arg(target_arg()),
            )
            .subcommand(sub("list").about("List the search history (newest first)"))
            .subcommand(
                sub("delete")
                    .about("Delete one entry from the history")
                    .arg(target_arg()),
            )
            .subcommand(sub("clear").about("Delete the whole search history")),
    )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let help = matches.get_flag("help") || matches.subcommand_matches("help").is_some();
    let home_dir = matches.get_one::<String>("home-dir").cloned();
    let engine = matches.get_one::<String>("engine").cloned();
    let verbose = matches.get_flag("verbose");

    let (command_name, command_args) = match matches.subcommand() {
        None | Some(("help", _)) | Some(("shell", _)) => (None, Vec::new()),
        Some(("search", m)) => (
            Some("search".to_string()),
            m.get_many::<String>("words")
                .map(|w| w.cloned().collect())
                .unwrap_or_default(),
        ),
        Some((name @ ("again" | "delete"), m)) => (
            Some(name.to_string()),
            m.get_one::<String>("target").cloned().into_iter().collect(),
        ),
        Some((name, _)) => (Some(name.to_string()), Vec::new()),
    };

    Config {
        help,
        home_dir,
        engine,
        verbose,
        command_name,
        command_args,
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

/// 引数列から解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "qsearch", &mut std::io::stdout());
}

/// Config を Command に変換する
pub fn config_to_command(config: &Config) -> Command {
    if config.help {
        return Command::Help;
    }
    match &config.command_name {
        Some(name) => Command::parse_with_args(name, &config.command_args),
        None => Command::Shell,
    }
}
