use arcstr::ArcStr;
use splitledger_domain::{
    Balance, ExpenseRecord, MemberId, Money, SettlementRecord, SimplifiedTransfer,
};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(ArcStr);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the balance pipeline needs about one group, already filtered
/// to that group by the data source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub members: Vec<MemberId>,
    pub expenses: Vec<ExpenseRecord>,
    pub settlements: Vec<SettlementRecord>,
}

impl GroupSnapshot {
    pub fn new(
        members: Vec<MemberId>,
        expenses: Vec<ExpenseRecord>,
        settlements: Vec<SettlementRecord>,
    ) -> Self {
        Self {
            members,
            expenses,
            settlements,
        }
    }

    /// Sum of every expense amount, regardless of who took part.
    pub fn total_expenses(&self) -> Money {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }
}

/// Debt and credit the simplifier could not match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Residue {
    pub debt: Money,
    pub credit: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupReport {
    pub balances: Vec<Balance>,
    pub transfers: Vec<SimplifiedTransfer>,
    pub total_expenses: Money,
    pub residue: Residue,
}

impl GroupReport {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}
