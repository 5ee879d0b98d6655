//! 対話シェル（入力欄と履歴一覧を持つ UI シェルの端末版）
//!
//! 1 行入力するとその文字列のまま検索する。`:` で始まる行はシェルのコマンド。
//! 履歴の操作はすべて HistoryIntents 経由で行い、通知の表示は Notifier に任せる。

use crate::adapter::ConsoleInput;
use crate::domain::{EntryRef, HistoryEntry, HistoryError};
use crate::ports::inbound::HistoryIntents;
use crate::ports::outbound::InterruptChecker;
use chrono::Local;
use common::error::Error;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const PROMPT: &str = "search> ";

/// 1 行の入力を解釈した結果
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellAction {
    Submit(String),
    Retry,
    List,
    Again(EntryRef),
    Delete(EntryRef),
    Clear,
    Help,
    Quit,
    Unknown(String),
}

/// 行末の改行だけを落とす（前後の空白はクエリの一部として残す）
fn parse_line(line: &str) -> ShellAction {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(rest) = line.strip_prefix(':') else {
        return ShellAction::Submit(line.to_string());
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();
    match (name, arg) {
        ("list" | "l", _) => ShellAction::List,
        ("again" | "a", Some(t)) => ShellAction::Again(EntryRef::parse(t)),
        ("delete" | "d", Some(t)) => ShellAction::Delete(EntryRef::parse(t)),
        ("clear", _) => ShellAction::Clear,
        ("retry" | "r", _) => ShellAction::Retry,
        ("help" | "h" | "?", _) => ShellAction::Help,
        ("quit" | "q" | "exit", _) => ShellAction::Quit,
        _ => ShellAction::Unknown(rest.trim().to_string()),
    }
}

pub struct InteractiveShell {
    intents: Arc<dyn HistoryIntents>,
    input: Arc<ConsoleInput>,
    interrupt: Arc<dyn InterruptChecker>,
    /// 操作の実行中は true（SIGINT ハンドラが即終了するかどうかの判断に使う）
    in_operation: Arc<AtomicBool>,
}

impl InteractiveShell {
    pub fn new(
        intents: Arc<dyn HistoryIntents>,
        input: Arc<ConsoleInput>,
        interrupt: Arc<dyn InterruptChecker>,
        in_operation: Arc<AtomicBool>,
    ) -> Self {
        Self {
            intents,
            input,
            interrupt,
            in_operation,
        }
    }

    /// EOF または :quit で 0、割り込みで 130 を返す
    pub fn run<R: BufRead, W: Write>(&self, mut reader: R, out: &mut W) -> Result<i32, Error> {
        writeln!(out, "Type a query and press Enter to search. :help for commands.")?;
        write_history(out, &self.intents.state().entries)?;

        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(0);
            }

            let action = parse_line(&line);
            if action == ShellAction::Quit {
                return Ok(0);
            }

            self.in_operation.store(true, Ordering::SeqCst);
            let result = self.dispatch(action, out);
            self.in_operation.store(false, Ordering::SeqCst);
            result?;

            if self.interrupt.is_interrupted() {
                writeln!(out, "Interrupted.")?;
                return Ok(130);
            }
        }
    }

    fn dispatch<W: Write>(&self, action: ShellAction, out: &mut W) -> Result<(), Error> {
        match action {
            ShellAction::Submit(text) => {
                self.input.set_text(&text);
                let result = self.intents.submit(&text);
                self.report(result.map(|_| ()), out)
            }
            ShellAction::Retry => {
                let text = self.input.text();
                if text.is_empty() {
                    writeln!(out, "Nothing to retry.")?;
                    return Ok(());
                }
                let result = self.intents.submit(&text);
                self.report(result.map(|_| ()), out)
            }
            ShellAction::List => write_history(out, &self.intents.state().entries),
            ShellAction::Again(target) => {
                let result = self
                    .lookup(&target)
                    .and_then(|entry| self.intents.search_again(&entry.query));
                self.report(result.map(|_| ()), out)
            }
            ShellAction::Delete(target) => {
                let result = self
                    .lookup(&target)
                    .and_then(|entry| self.intents.delete(&entry.id));
                self.report(result.map(|_| ()), out)
            }
            ShellAction::Clear => {
                let result = self.intents.clear_all();
                self.report(result, out)
            }
            ShellAction::Help => write_shell_help(out),
            ShellAction::Unknown(name) => {
                writeln!(out, "Unknown command ':{}'. Type :help for commands.", name)?;
                Ok(())
            }
            ShellAction::Quit => Ok(()),
        }
    }

    fn lookup(&self, target: &EntryRef) -> Result<HistoryEntry, HistoryError> {
        target
            .resolve_in(&self.intents.state().entries)
            .cloned()
            .ok_or_else(|| HistoryError::NotFound(target.to_string()))
    }

    /// 操作の失敗を 1 行で表示する。ブラウザ起動の失敗は通知済みなので出さない
    fn report<W: Write>(&self, result: Result<(), HistoryError>, out: &mut W) -> Result<(), Error> {
        match result {
            Ok(()) | Err(HistoryError::Launch(_)) => Ok(()),
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Ok(())
            }
        }
    }
}

/// 履歴一覧（新しい順、番号は 1 始まり）
pub fn write_history<W: Write>(out: &mut W, entries: &[HistoryEntry]) -> Result<(), Error> {
    if entries.is_empty() {
        writeln!(out, "(no search history)")?;
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {}  {}  {}",
            i + 1,
            entry.id,
            entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            entry.query
        )?;
    }
    Ok(())
}

fn write_shell_help<W: Write>(out: &mut W) -> Result<(), Error> {
    writeln!(out, "  <text>          Search for <text> exactly as typed")?;
    writeln!(out, "  :list           Show the search history (1 = newest)")?;
    writeln!(out, "  :again <n|id>   Search again for a history entry")?;
    writeln!(out, "  :delete <n|id>  Remove a history entry")?;
    writeln!(out, "  :clear          Remove every history entry")?;
    writeln!(out, "  :retry          Resubmit the text of the last failed search")?;
    writeln!(out, "  :help           Show this help")?;
    writeln!(out, "  :quit           Leave the shell (Ctrl+D also works)")?;
    Ok(())
}
