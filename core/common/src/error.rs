//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。CLI 境界で `exit_code()` により終了コードへ変換する。

/// 共通エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// ファイル I/O 等の失敗
    #[error("{0}")]
    Io(String),

    /// JSON のシリアライズ・パース失敗
    #[error("JSON error: {0}")]
    Json(String),

    /// 環境変数・ディレクトリ解決の失敗
    #[error("{0}")]
    Env(String),

    /// 引数・設定の不正（使い方の誤り）
    #[error("{0}")]
    InvalidArgument(String),

    /// 外部呼び出しが制限時間内に終わらなかった
    #[error("timed out: {0}")]
    Timeout(String),

    /// その他のシステムエラー
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Error::Timeout(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// 使い方の誤りか（main で usage を併記するか判定する）
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// プロセス終了コード（sysexits.h に準拠）
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::Json(_) => 65,
            Error::System(_) | Error::Env(_) => 70,
            Error::Io(_) => 74,
            Error::Timeout(_) => 75,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
