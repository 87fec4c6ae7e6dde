//! Wallet engine error taxonomy
//!
//! Every failure that crosses the engine boundary is one of these kinds.
//! Store-level errors are classified here from their SQLSTATE codes so that
//! `?` propagates an already-classified error out of any repository call.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WalletError {
    /// Input violated a precondition (bad user id, empty asset code,
    /// non-positive amount, oversized idempotency key).
    #[error("{0}")]
    Validation(String),

    /// Wallet, user, asset, or transaction does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Source wallet would go below its floor.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        wallet_id: Uuid,
        requested: i64,
        available: i64,
    },

    /// Uniqueness collision on an idempotency key with no cached response.
    #[error("duplicate transaction for idempotency key")]
    DuplicateTransaction,

    /// A storage-layer check constraint fired. The engine verifies balances
    /// before writing, so this is the safety net, not the primary check.
    #[error("storage constraint violated: {0}")]
    ConstraintViolation(String),

    /// The store aborted the transaction to break a deadlock. Retryable.
    #[error("transaction aborted to break a deadlock")]
    DeadlockDetected,

    /// Concurrent modification detected under a stricter isolation level.
    /// Retryable.
    #[error("serialization failure, concurrent modification detected")]
    SerializationFailure,

    /// Connection pool exhausted past the acquire timeout.
    #[error("timed out acquiring a store connection")]
    ConnectionTimeout,

    /// The server cancelled a statement that exceeded the statement timeout.
    #[error("statement cancelled by server timeout")]
    StatementTimeout,

    /// Unclassified failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WalletError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether the caller may safely retry the whole request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DeadlockDetected | Self::SerializationFailure
        )
    }
}

/// Map a PostgreSQL SQLSTATE to the engine taxonomy.
///
/// The only uniqueness constraint the transfer path can collide on at
/// runtime is `transactions.idempotency_key`, so 23505 maps straight to
/// `DuplicateTransaction`; the orchestrator then runs the cache re-read
/// recovery before surfacing it.
fn classify_sqlstate(code: &str, message: &str) -> WalletError {
    match code {
        "23505" => WalletError::DuplicateTransaction,
        "23514" => WalletError::ConstraintViolation(message.to_string()),
        "40P01" => WalletError::DeadlockDetected,
        "40001" => WalletError::SerializationFailure,
        "57014" => WalletError::StatementTimeout,
        _ => WalletError::Internal(format!("store error {}: {}", code, message)),
    }
}

impl From<sqlx::Error> for WalletError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => WalletError::ConnectionTimeout,
            sqlx::Error::RowNotFound => WalletError::NotFound("record not found".to_string()),
            sqlx::Error::Database(db) => match db.code() {
                Some(code) => classify_sqlstate(&code, db.message()),
                None => WalletError::Internal(db.message().to_string()),
            },
            _ => WalletError::Internal(err.to_string()),
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unique_violation() {
        let err = classify_sqlstate("23505", "duplicate key value violates unique constraint");
        assert!(matches!(err, WalletError::DuplicateTransaction));
    }

    #[test]
    fn test_classify_check_violation() {
        let err = classify_sqlstate("23514", "balance floor");
        assert!(matches!(err, WalletError::ConstraintViolation(_)));
    }

    #[test]
    fn test_classify_deadlock_is_retryable() {
        let err = classify_sqlstate("40P01", "deadlock detected");
        assert!(matches!(err, WalletError::DeadlockDetected));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_serialization_failure_is_retryable() {
        let err = classify_sqlstate("40001", "could not serialize access");
        assert!(matches!(err, WalletError::SerializationFailure));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_statement_timeout() {
        let err = classify_sqlstate("57014", "canceling statement due to statement timeout");
        assert!(matches!(err, WalletError::StatementTimeout));
    }

    #[test]
    fn test_unknown_sqlstate_is_internal() {
        let err = classify_sqlstate("42P01", "relation does not exist");
        assert!(matches!(err, WalletError::Internal(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_business_failures_not_retryable() {
        assert!(!WalletError::validation("bad input").is_retryable());
        assert!(!WalletError::DuplicateTransaction.is_retryable());
        assert!(
            !WalletError::InsufficientBalance {
                wallet_id: Uuid::nil(),
                requested: 10,
                available: 5,
            }
            .is_retryable()
        );
    }
}
