//! Construction of expense shares from the split rules offered to users.
//!
//! Computed shares are always quantized to cents and always sum exactly to
//! the expense amount: leftover cents are handed out one at a time in list
//! order, and a sub-cent remainder (only possible when the amount itself has
//! sub-cent digits) lands on the first participant.

use crate::{
    error::SplitError,
    model::{ExpenseRecord, MemberId, Money, Participant},
};
use rust_decimal::Decimal;

const HUNDRED_PERCENT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitRule {
    /// Everyone listed owes the same share.
    Equal(Vec<MemberId>),
    /// Shares given explicitly per member.
    Exact(Vec<(MemberId, Money)>),
    /// Shares given as percentages of the amount; must total 100.
    Percentage(Vec<(MemberId, Decimal)>),
}

impl ExpenseRecord {
    /// Builds an expense whose participant shares follow `rule`.
    pub fn from_split(
        payer: impl Into<MemberId>,
        amount: Money,
        rule: SplitRule,
    ) -> Result<Self, SplitError> {
        if !amount.is_positive() {
            return Err(SplitError::NonPositiveAmount(amount));
        }

        let participants = match rule {
            SplitRule::Equal(members) => equal_shares(amount, members)?,
            SplitRule::Exact(shares) => exact_shares(amount, shares)?,
            SplitRule::Percentage(shares) => percentage_shares(amount, shares)?,
        };

        Ok(Self {
            payer: payer.into(),
            amount,
            participants,
        })
    }

    /// Checks the record against the invariants expected by the balance fold.
    pub fn validate(&self) -> Result<(), SplitError> {
        if !self.amount.is_positive() {
            return Err(SplitError::NonPositiveAmount(self.amount));
        }
        if self.participants.is_empty() {
            return Err(SplitError::NoParticipants);
        }
        if let Some(negative) = self
            .participants
            .iter()
            .find(|p| p.amount_owed.is_negative())
        {
            return Err(SplitError::NegativeShare {
                member: negative.member.clone(),
                amount: negative.amount_owed,
            });
        }

        let actual = self.share_total();
        if !actual.approx_eq(self.amount) {
            return Err(SplitError::SharesMismatch {
                expected: self.amount,
                actual,
            });
        }
        Ok(())
    }
}

fn equal_shares(amount: Money, members: Vec<MemberId>) -> Result<Vec<Participant>, SplitError> {
    if members.is_empty() {
        return Err(SplitError::NoParticipants);
    }

    let count = Decimal::from(members.len());
    let raw = members
        .into_iter()
        .map(|member| (member, Money::from_decimal(amount.as_decimal() / count)))
        .collect();
    Ok(allocate_cents(amount, raw))
}

fn exact_shares(
    amount: Money,
    shares: Vec<(MemberId, Money)>,
) -> Result<Vec<Participant>, SplitError> {
    if shares.is_empty() {
        return Err(SplitError::NoParticipants);
    }
    if let Some((member, share)) = shares.iter().find(|(_, share)| share.is_negative()) {
        return Err(SplitError::NegativeShare {
            member: member.clone(),
            amount: *share,
        });
    }

    let actual: Money = shares.iter().map(|(_, share)| *share).sum();
    if !actual.approx_eq(amount) {
        return Err(SplitError::SharesMismatch {
            expected: amount,
            actual,
        });
    }

    Ok(shares
        .into_iter()
        .map(|(member, share)| Participant::new(member, share))
        .collect())
}

fn percentage_shares(
    amount: Money,
    shares: Vec<(MemberId, Decimal)>,
) -> Result<Vec<Participant>, SplitError> {
    if shares.is_empty() {
        return Err(SplitError::NoParticipants);
    }
    if let Some((member, percent)) = shares.iter().find(|(_, pct)| *pct < Decimal::ZERO) {
        return Err(SplitError::NegativeShare {
            member: member.clone(),
            amount: amount * (*percent / HUNDRED_PERCENT),
        });
    }

    let total: Decimal = shares.iter().map(|(_, pct)| *pct).sum();
    // Exactly 100, so truncated shares never add up past the amount.
    if total != HUNDRED_PERCENT {
        return Err(SplitError::PercentagesMismatch { total });
    }

    let raw = shares
        .into_iter()
        .map(|(member, pct)| (member, amount * (pct / HUNDRED_PERCENT)))
        .collect();
    Ok(allocate_cents(amount, raw))
}

/// Truncates raw shares to cents, then redistributes what truncation lost.
fn allocate_cents(amount: Money, raw: Vec<(MemberId, Money)>) -> Vec<Participant> {
    let mut participants: Vec<Participant> = raw
        .into_iter()
        .map(|(member, share)| Participant::new(member, share.truncate_to_cents()))
        .collect();

    let mut leftover = amount - participants.iter().map(|p| p.amount_owed).sum::<Money>();
    for participant in participants.iter_mut() {
        if leftover < Money::EPSILON {
            break;
        }
        participant.amount_owed += Money::EPSILON;
        leftover -= Money::EPSILON;
    }
    if let Some(first) = participants.first_mut() {
        first.amount_owed += leftover;
    }

    participants
}
