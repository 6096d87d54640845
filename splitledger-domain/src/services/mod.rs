pub mod balance_calculator;
pub mod debt_simplifier;

pub use balance_calculator::{compute_balances, compute_balances_strict};
pub use debt_simplifier::{Simplification, simplify_debts, simplify_debts_with_residue};
