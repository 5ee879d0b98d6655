//! システムの既定ブラウザで URL を開く UrlLauncher 実装（open クレート）

use crate::ports::outbound::UrlLauncher;
use common::adapter::run_with_timeout;
use common::error::Error;
use std::time::Duration;

pub struct BrowserLauncher {
    timeout: Duration,
}

impl BrowserLauncher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl UrlLauncher for BrowserLauncher {
    fn open(&self, url: &str) -> Result<(), Error> {
        let url = url.to_string();
        run_with_timeout("launch", self.timeout, move || {
            open::that(&url).map_err(|e| Error::io_msg(e.to_string()))
        })
    }
}
