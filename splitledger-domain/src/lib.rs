#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;
pub mod split;

pub use error::{LedgerIntegrityError, RecordRef, SplitError};
pub use model::{
    Balance, ExpenseRecord, MemberId, Money, Participant, SettlementRecord, SimplifiedTransfer,
};
pub use services::{
    Simplification, compute_balances, compute_balances_strict, simplify_debts,
    simplify_debts_with_residue,
};
pub use split::SplitRule;
