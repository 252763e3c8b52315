//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (storefront app) ← code + message for the CLI                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Everything that can go wrong between the storefront and its SQLite file.
#[derive(Debug, Error)]
pub enum DbError {
    /// No order (or other row) with that id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// An order id or outbox entry that already exists.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A CHECK constraint rejected a row (quantity out of range, etc).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// An order line pointing at a missing order.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The data directory or file could not be opened, or the pool was
    /// already closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for any other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A JSON column could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Classifies sqlx errors. SQLite only reports constraint kinds in the
/// message text:
///
/// ```text
/// "UNIQUE constraint failed: orders.order_id"  → UniqueViolation
/// "CHECK constraint failed: ..."               → ConstraintViolation
/// "FOREIGN KEY constraint failed"              → ForeignKeyViolation
/// RowNotFound / PoolTimedOut / PoolClosed      → NotFound / PoolExhausted / ConnectionFailed
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(field, "unknown")
                } else if msg.contains("CHECK constraint failed") {
                    DbError::ConstraintViolation(msg.to_string())
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(sqlx::Error::RowNotFound, "NotFound")]
    #[case(sqlx::Error::PoolTimedOut, "PoolExhausted")]
    #[case(sqlx::Error::PoolClosed, "ConnectionFailed")]
    #[case(sqlx::Error::Protocol("bad frame".to_string()), "Internal")]
    fn test_sqlx_error_classification(#[case] source: sqlx::Error, #[case] expected: &str) {
        let err = DbError::from(source);
        assert!(
            format!("{:?}", err).starts_with(expected),
            "{:?} is not {}",
            err,
            expected
        );
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: DbError = json_err.into();
        assert!(err.to_string().starts_with("Serialization failed"));
    }
}
