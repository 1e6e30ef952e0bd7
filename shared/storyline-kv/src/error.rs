//! Key-Value Store Error Types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KvError>;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("Query error: {}", describe(.0))]
    Query(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// `tokio_postgres::Error` displays only "db error" for server-side
/// failures; the SQLSTATE and message live on the inner `DbError`.
fn describe(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => format!("{} ({})", db.message(), db.code().code()),
        None => err.to_string(),
    }
}
