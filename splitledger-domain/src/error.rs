use crate::model::{MemberId, Money};
use std::fmt;
use thiserror::Error;

/// Position of a record inside the input slices of a balance computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordRef {
    Expense { index: usize },
    Settlement { index: usize },
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense { index } => write!(f, "expense #{index}"),
            Self::Settlement { index } => write!(f, "settlement #{index}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerIntegrityError {
    #[error("{record} references member '{member}' who is not part of the group")]
    UnknownMember { member: MemberId, record: RecordRef },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("Expense amount must be positive (found {0})")]
    NonPositiveAmount(Money),
    #[error("Expense has no participants")]
    NoParticipants,
    #[error("Share of member '{member}' is negative ({amount})")]
    NegativeShare { member: MemberId, amount: Money },
    #[error("Shares sum to {actual} but the expense amount is {expected}")]
    SharesMismatch { expected: Money, actual: Money },
    #[error("Percentages sum to {total} instead of 100")]
    PercentagesMismatch { total: rust_decimal::Decimal },
}
