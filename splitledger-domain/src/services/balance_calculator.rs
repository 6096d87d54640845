use crate::{
    error::{LedgerIntegrityError, RecordRef},
    model::{Balance, ExpenseRecord, MemberId, Money, SettlementRecord},
};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use std::convert::Infallible;

/// Folds expenses and settlements into one net balance per member.
///
/// The output contains exactly one entry per distinct id in `members`, in
/// input order, including members without any activity. Amounts referencing
/// ids outside `members` are dropped; each drop is reported as a `warn` event.
/// Final balances are rounded to cents, intermediate sums are exact.
pub fn compute_balances(
    members: &[MemberId],
    expenses: &[ExpenseRecord],
    settlements: &[SettlementRecord],
) -> Vec<Balance> {
    let Ok(balances) = fold_balances(members, expenses, settlements, |member, record| {
        tracing::warn!(
            member = %member,
            record = %record,
            "Dropping contribution of a member outside the group"
        );
        Ok::<(), Infallible>(())
    });
    balances
}

/// Same fold as [`compute_balances`], but a reference to an id outside
/// `members` fails the whole computation instead of being dropped.
pub fn compute_balances_strict(
    members: &[MemberId],
    expenses: &[ExpenseRecord],
    settlements: &[SettlementRecord],
) -> Result<Vec<Balance>, LedgerIntegrityError> {
    fold_balances(members, expenses, settlements, |member, record| {
        Err(LedgerIntegrityError::UnknownMember {
            member: member.clone(),
            record,
        })
    })
}

struct BalanceAccumulator {
    balances: IndexMap<MemberId, Money, FxBuildHasher>,
}

impl BalanceAccumulator {
    fn new(members: &[MemberId]) -> Self {
        let balances = members
            .iter()
            .map(|member| (member.clone(), Money::ZERO))
            .collect();
        Self { balances }
    }

    fn apply<E>(
        &mut self,
        member: &MemberId,
        delta: Money,
        record: RecordRef,
        on_unknown: &mut impl FnMut(&MemberId, RecordRef) -> Result<(), E>,
    ) -> Result<(), E> {
        match self.balances.get_mut(member) {
            Some(balance) => {
                *balance += delta;
                Ok(())
            }
            None => on_unknown(member, record),
        }
    }

    fn into_balances(self) -> Vec<Balance> {
        self.balances
            .into_iter()
            .map(|(member, net)| Balance {
                member,
                net_balance: net.round_to_cents(),
            })
            .collect()
    }
}

fn fold_balances<E>(
    members: &[MemberId],
    expenses: &[ExpenseRecord],
    settlements: &[SettlementRecord],
    mut on_unknown: impl FnMut(&MemberId, RecordRef) -> Result<(), E>,
) -> Result<Vec<Balance>, E> {
    let mut accumulator = BalanceAccumulator::new(members);

    for (index, expense) in expenses.iter().enumerate() {
        let record = RecordRef::Expense { index };
        // The payer fronted the full amount; every participant owes its share.
        accumulator.apply(&expense.payer, expense.amount, record, &mut on_unknown)?;
        for participant in &expense.participants {
            accumulator.apply(
                &participant.member,
                -participant.amount_owed,
                record,
                &mut on_unknown,
            )?;
        }
    }

    for (index, settlement) in settlements.iter().enumerate() {
        let record = RecordRef::Settlement { index };
        // Paying back moves the payer towards zero from below and absorbs
        // the payee's credit.
        accumulator.apply(&settlement.payer, settlement.amount, record, &mut on_unknown)?;
        accumulator.apply(&settlement.payee, -settlement.amount, record, &mut on_unknown)?;
    }

    tracing::debug!(
        member_count = accumulator.balances.len(),
        expense_count = expenses.len(),
        settlement_count = settlements.len(),
        "Computed member balances"
    );

    Ok(accumulator.into_balances())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;
    use rstest::{fixture, rstest};

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().copied().map(MemberId::from).collect()
    }

    fn balances(expected: &[(&str, i64)]) -> Vec<Balance> {
        expected
            .iter()
            .map(|(member, amount)| Balance::new(*member, Money::from_i64(*amount)))
            .collect()
    }

    #[fixture]
    fn lunch() -> ExpenseRecord {
        ExpenseRecord::new(
            "a",
            Money::from_i64(100),
            [
                Participant::new("a", Money::from_i64(50)),
                Participant::new("b", Money::from_i64(50)),
            ],
        )
    }

    #[test]
    fn no_activity_yields_zero_balances() {
        let result = compute_balances(&ids(&["a", "b", "c"]), &[], &[]);
        assert_eq!(result, balances(&[("a", 0), ("b", 0), ("c", 0)]));
    }

    #[rstest]
    fn single_equal_split_expense(lunch: ExpenseRecord) {
        let result = compute_balances(&ids(&["a", "b"]), &[lunch], &[]);
        assert_eq!(result, balances(&[("a", 50), ("b", -50)]));
    }

    #[rstest]
    fn settlement_cancels_debt(lunch: ExpenseRecord) {
        let settlement = SettlementRecord::new("b", "a", Money::from_i64(50));
        let result = compute_balances(&ids(&["a", "b"]), &[lunch], &[settlement]);
        assert_eq!(result, balances(&[("a", 0), ("b", 0)]));
    }

    #[rstest]
    #[case::payer_not_participating(
        ExpenseRecord::new(
            "a",
            Money::from_i64(60),
            [
                Participant::new("b", Money::from_i64(30)),
                Participant::new("c", Money::from_i64(30)),
            ],
        ),
        &[("a", 60), ("b", -30), ("c", -30)]
    )]
    #[case::uneven_shares(
        ExpenseRecord::new(
            "b",
            Money::from_i64(90),
            [
                Participant::new("a", Money::from_i64(10)),
                Participant::new("b", Money::from_i64(20)),
                Participant::new("c", Money::from_i64(60)),
            ],
        ),
        &[("a", -10), ("b", 70), ("c", -60)]
    )]
    fn expense_shapes(#[case] expense: ExpenseRecord, #[case] expected: &[(&str, i64)]) {
        let result = compute_balances(&ids(&["a", "b", "c"]), &[expense], &[]);
        assert_eq!(result, balances(expected));
    }

    #[test]
    fn output_follows_member_order() {
        let settlement = SettlementRecord::new("a", "c", Money::from_i64(5));
        let result = compute_balances(&ids(&["c", "a", "b"]), &[], &[settlement]);
        assert_eq!(result, balances(&[("c", -5), ("a", 5), ("b", 0)]));
    }

    #[test]
    fn duplicate_member_ids_collapse() {
        let result = compute_balances(&ids(&["a", "b", "a"]), &[], &[]);
        assert_eq!(result, balances(&[("a", 0), ("b", 0)]));
    }

    #[rstest]
    fn unknown_members_are_dropped(lunch: ExpenseRecord) {
        let stranger_settlement = SettlementRecord::new("z", "a", Money::from_i64(20));
        let result = compute_balances(&ids(&["a"]), &[lunch], &[stranger_settlement]);
        // a: +100 paid, -50 own share, -20 received; b and z are ignored.
        assert_eq!(result, balances(&[("a", 30)]));
    }

    #[rstest]
    fn strict_rejects_unknown_members(lunch: ExpenseRecord) {
        let result = compute_balances_strict(&ids(&["a"]), &[lunch], &[]);
        assert_eq!(
            result,
            Err(LedgerIntegrityError::UnknownMember {
                member: MemberId::from("b"),
                record: RecordRef::Expense { index: 0 },
            })
        );
    }

    #[rstest]
    fn strict_matches_lenient_on_closed_groups(lunch: ExpenseRecord) {
        let members = ids(&["a", "b"]);
        let settlement = SettlementRecord::new("b", "a", Money::from_i64(20));
        let lenient = compute_balances(&members, &[lunch.clone()], &[settlement.clone()]);
        let strict = compute_balances_strict(&members, &[lunch], &[settlement]);
        assert_eq!(strict, Ok(lenient));
    }

    #[test]
    fn rounds_only_final_values() {
        // Three thirds of a cent each add up to a full cent before rounding.
        let third = Money::new(3333, 6);
        let expenses: Vec<ExpenseRecord> = (0..3)
            .map(|_| ExpenseRecord::new("a", third, [Participant::new("b", third)]))
            .collect();
        let result = compute_balances(&ids(&["a", "b"]), &expenses, &[]);
        assert_eq!(result, vec![
            Balance::new("a", Money::new(1, 2)),
            Balance::new("b", Money::new(-1, 2)),
        ]);
    }
}
