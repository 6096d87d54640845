use crate::{
    config::{LedgerConfig, ReferencePolicy},
    error::LedgerError,
    model::{GroupId, GroupReport, GroupSnapshot, Residue},
    ports::LedgerSource,
};
use splitledger_domain::{compute_balances, compute_balances_strict, simplify_debts_with_residue};

/// Runs the balance pipeline for groups supplied by a [`LedgerSource`].
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    source: &'a dyn LedgerSource,
    config: LedgerConfig,
}

impl<'a> LedgerService<'a> {
    pub fn new(source: &'a dyn LedgerSource, config: LedgerConfig) -> Self {
        Self { source, config }
    }

    pub fn report(&self, group: &GroupId) -> Result<GroupReport, LedgerError> {
        let snapshot = self.source.load_group(group)?;
        let report = self.report_snapshot(&snapshot)?;

        tracing::info!(
            group = %group,
            policy = %self.config.reference_policy,
            member_count = report.balances.len(),
            transfer_count = report.transfers.len(),
            total_expenses = %report.total_expenses,
            "Built group report"
        );
        Ok(report)
    }

    pub fn report_snapshot(&self, snapshot: &GroupSnapshot) -> Result<GroupReport, LedgerError> {
        let strict = self.config.reference_policy == ReferencePolicy::Strict;

        let balances = if strict {
            for (index, expense) in snapshot.expenses.iter().enumerate() {
                expense
                    .validate()
                    .map_err(|source| LedgerError::InvalidExpense { index, source })?;
            }
            compute_balances_strict(
                &snapshot.members,
                &snapshot.expenses,
                &snapshot.settlements,
            )?
        } else {
            compute_balances(
                &snapshot.members,
                &snapshot.expenses,
                &snapshot.settlements,
            )
        };

        let simplification = simplify_debts_with_residue(&balances);
        if strict && !simplification.is_balanced() {
            return Err(LedgerError::UnbalancedResidue {
                debt: simplification.unsettled_debt,
                credit: simplification.unsettled_credit,
            });
        }

        Ok(GroupReport {
            balances,
            transfers: simplification.transfers,
            total_expenses: snapshot.total_expenses(),
            residue: Residue {
                debt: simplification.unsettled_debt,
                credit: simplification.unsettled_credit,
            },
        })
    }
}
