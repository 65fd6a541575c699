//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Core(#[from] stockdash_core::CoreError),

    #[error("{0}")]
    Dashboard(#[from] stockdash_dashboard::DashboardError),

    #[error("Storage error: {0}")]
    Storage(#[from] stockdash_dashboard::StoreError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
