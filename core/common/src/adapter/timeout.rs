//! ブロッキング呼び出しに制限時間を付けるヘルパー
//!
//! 呼び出しを補助スレッドで実行し、`recv_timeout` で待つ。時間切れの場合、
//! 補助スレッドは結果を捨てて後から終了する（呼び出し自体は取り消せない）。

use crate::error::Error;
use std::sync::mpsc;
use std::time::Duration;

/// `f` を補助スレッドで実行し、`timeout` 以内の結果を返す
///
/// 時間切れは `Error::Timeout`、補助スレッドが結果を返さずに終わった場合（panic 等）は `Error::System`。
pub fn run_with_timeout<T, F>(label: &str, timeout: Duration, f: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name(format!("qsearch-{}", label))
        .spawn(move || {
            let _ = tx.send(f());
        })
        .map_err(|e| Error::system(format!("Failed to spawn {} worker: {}", label, e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::timeout(format!(
            "{} did not finish within {} ms",
            label,
            timeout.as_millis()
        ))),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(Error::system(format!(
            "{} worker exited without a result",
            label
        ))),
    }
}
