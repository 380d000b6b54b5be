//! Error types for mailburst

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BurstError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("setup error: {0}")]
    Setup(String),

    #[error("address error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("message build error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BurstError {
    /// Process exit code for fatal errors surfaced by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            BurstError::Config(_) | BurstError::Address(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BurstError>;
