// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 控制接口错误类型
//! Error types for the run control surface

use thiserror::Error;

/// Result type alias for the control surface
pub type Result<T> = std::result::Result<T, CounterError>;

/// 启动/停止/配置过程中可能出现的错误
#[derive(Error, Debug)]
pub enum CounterError {
    #[error("no input source selected")]
    NoSourceSelected,

    #[error("a run is already in progress")]
    AlreadyRunning,

    #[error("failed to open source {handle}: {reason}")]
    SourceOpen { handle: String, reason: String },

    #[error("worker thread panicked")]
    WorkerPanicked,

    #[error("detector unavailable")]
    DetectorUnavailable,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CounterError {
    pub fn source_open<S: Into<String>>(handle: S, reason: impl std::fmt::Display) -> Self {
        Self::SourceOpen {
            handle: handle.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
