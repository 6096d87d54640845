use crate::model::GroupId;
use splitledger_domain::{LedgerIntegrityError, Money, SplitError};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown reference policy '{0}' (expected 'lenient' or 'strict')")]
    UnknownReferencePolicy(String),
    #[error("Environment variable {0} is not valid Unicode")]
    NotUnicode(&'static str),
}

/// Failures reported by a [`crate::LedgerSource`] implementation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerSourceError {
    #[error("Group '{0}' was not found")]
    GroupNotFound(GroupId),
    #[error("Group document has no members declaration")]
    MissingMembersDeclaration,
    #[error("Line {line}: undefined member '{name}'")]
    UndefinedMember { name: String, line: usize },
    #[error("Line {line}: {source}")]
    InvalidSplit {
        line: usize,
        #[source]
        source: SplitError,
    },
    #[error("Line {line}: {detail}")]
    Malformed { line: usize, detail: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Source(#[from] LedgerSourceError),
    #[error(transparent)]
    Integrity(#[from] LedgerIntegrityError),
    #[error("Expense #{index} is malformed: {source}")]
    InvalidExpense {
        index: usize,
        #[source]
        source: SplitError,
    },
    #[error("Balances do not net to zero (unmatched debt {debt}, unmatched credit {credit})")]
    UnbalancedResidue { debt: Money, credit: Money },
}
