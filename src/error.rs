// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failure classes surfaced by the ledger core.
///
/// `Db` covers persistence failures (including constraint violations raised
/// by SQLite itself) and is retryable once the store is reachable again.
/// `Validation` means the caller's input was rejected before any write.
/// `Invariant` reports stored data found in a state the core never writes.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// True when the underlying SQLite error is a constraint violation, so a
    /// caller can treat it as bad input rather than a connectivity problem.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            LedgerError::Db(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
