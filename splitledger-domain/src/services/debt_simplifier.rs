use crate::model::{Balance, MemberId, Money, SimplifiedTransfer};

/// Outcome of a simplification run, including what could not be matched.
///
/// `unsettled_debt` and `unsettled_credit` are both (near) zero whenever the
/// input balances sum to zero. One cent of either is tolerated as rounding
/// drift. A non-zero residue points at upstream rounding
/// drift or at balances taken from an incomplete group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Simplification {
    pub transfers: Vec<SimplifiedTransfer>,
    pub unsettled_debt: Money,
    pub unsettled_credit: Money,
}

impl Simplification {
    pub fn is_balanced(&self) -> bool {
        self.unsettled_debt <= Money::EPSILON && self.unsettled_credit <= Money::EPSILON
    }
}

/// Suggests transfers that bring every balance to (near) zero.
///
/// Greedy matching of the largest remaining debtor with the largest remaining
/// creditor. Amounts of one cent or less are never emitted; any residue left
/// once one side runs out is dropped.
pub fn simplify_debts(balances: &[Balance]) -> Vec<SimplifiedTransfer> {
    simplify_debts_with_residue(balances).transfers
}

struct Party<'a> {
    member: &'a MemberId,
    remaining: Money,
}

pub fn simplify_debts_with_residue(balances: &[Balance]) -> Simplification {
    let mut debtors: Vec<Party<'_>> = balances
        .iter()
        .filter(|balance| balance.net_balance.is_negative())
        .map(|balance| Party {
            member: &balance.member,
            remaining: -balance.net_balance,
        })
        .collect();
    let mut creditors: Vec<Party<'_>> = balances
        .iter()
        .filter(|balance| balance.net_balance.is_positive())
        .map(|balance| Party {
            member: &balance.member,
            remaining: balance.net_balance,
        })
        .collect();

    // Stable sorts: equal amounts keep their input order.
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut transfers =
        Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);

    while let (Some(debtor), Some(creditor)) = (debtors.get_mut(i), creditors.get_mut(j)) {
        let amount = debtor.remaining.min(creditor.remaining);
        if amount > Money::EPSILON {
            transfers.push(SimplifiedTransfer {
                from: debtor.member.clone(),
                to: creditor.member.clone(),
                amount,
            });
        }

        debtor.remaining -= amount;
        creditor.remaining -= amount;

        if debtor.remaining < Money::EPSILON {
            i += 1;
        }
        if creditor.remaining < Money::EPSILON {
            j += 1;
        }
    }

    let unsettled_debt: Money = debtors[i..].iter().map(|party| party.remaining).sum();
    let unsettled_credit: Money = creditors[j..].iter().map(|party| party.remaining).sum();

    if !unsettled_debt.is_zero() || !unsettled_credit.is_zero() {
        tracing::warn!(
            unsettled_debt = %unsettled_debt,
            unsettled_credit = %unsettled_credit,
            "Balances do not net to zero; residue left unmatched"
        );
    }
    tracing::debug!(
        debtor_count = debtors.len(),
        creditor_count = creditors.len(),
        transfer_count = transfers.len(),
        "Simplified debts"
    );

    Simplification {
        transfers,
        unsettled_debt,
        unsettled_credit,
    }
}
