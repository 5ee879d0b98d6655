//! URL を外部ブラウザで開く Outbound ポート

use common::error::Error;

pub trait UrlLauncher: Send + Sync {
    /// URL を開く。開けなかった場合（時間切れを含む）は Err
    fn open(&self, url: &str) -> Result<(), Error>;
}
