// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the service and record store.
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Missing field, malformed identifier or out-of-range value.
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    /// The record store could not be reached or rejected the operation.
    #[error("Record store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

impl FinanceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FinanceError::Validation(msg.into())
    }

    pub fn transaction_not_found(id: &str) -> Self {
        FinanceError::NotFound {
            kind: "Transaction",
            id: id.to_string(),
        }
    }

    pub fn debt_not_found(id: &str) -> Self {
        FinanceError::NotFound {
            kind: "Debt",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FinanceError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FinanceError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
