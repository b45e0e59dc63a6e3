#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("image already in catalog: {uri}")]
    DuplicateEntry { uri: String },

    #[error("image URI is empty")]
    InvalidUri,

    #[error("image not found: {0}")]
    EntryNotFound(String),

    #[error("page size must be at least 1")]
    InvalidPageSize,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("corrupt data under key `{key}`: {message}")]
    CorruptData { key: String, message: String },

    #[error("unsupported image URI: {0}")]
    UnsupportedUri(String),

    #[error("failed to download {uri}: {message}")]
    DownloadFailed { uri: String, message: String },

    #[error("store schema version {db} is newer than supported version {code} — upgrade walltastic")]
    SchemaTooNew { db: u32, code: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
