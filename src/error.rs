use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PixivError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Error in config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PixivError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            PixivError::Http { .. } => "http_error",
            PixivError::FileExists(_) => "file_exists",
            PixivError::Transport(_) => "transport_error",
            PixivError::Decode(_) => "decode_error",
            PixivError::InvalidToken(_) => "invalid_token",
            PixivError::Config { .. } => "config_error",
            PixivError::Io(_) => "io_error",
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PixivError::Http { status, .. } => Some(*status),
            PixivError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(status) = self.status() {
            obj.insert("status".into(), serde_json::Value::from(status));
        }
        if let PixivError::FileExists(path) = self {
            obj.insert(
                "path".into(),
                serde_json::Value::String(path.display().to_string()),
            );
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
