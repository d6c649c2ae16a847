// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger core: exchange-rate resolution, income calculation,
//! fixed-liability reconciliation, and balance/forecast aggregation.
//! Everything here is UI-free and callable from any front end.

pub mod fixed;
pub mod income;
pub mod rates;
pub mod summary;

use crate::error::{LedgerError, LedgerResult};
use rust_decimal::Decimal;

/// Parse a decimal persisted as TEXT. Failure means the stored row was
/// written by something other than this core.
pub(crate) fn stored_decimal(s: &str, what: &str) -> LedgerResult<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::Invariant(format!("unparseable {} '{}'", what, s)))
}
