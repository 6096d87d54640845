use arcstr::ArcStr;
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

/// Opaque identifier of a group member.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(ArcStr);

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(ArcStr::from(value))
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currency amount with exact decimal arithmetic.
///
/// Amounts are expected in major units with cent precision (e.g. `12.34`).
/// Intermediate values may carry more fractional digits; only
/// [`Money::round_to_cents`] quantizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One cent. Amounts at or below this are treated as settled.
    pub const EPSILON: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds to two fractional digits, midpoints away from zero.
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Drops every fractional digit past the cent.
    pub fn truncate_to_cents(self) -> Self {
        Self(self.0.round_dp_with_strategy(2, RoundingStrategy::ToZero))
    }

    /// True when the two amounts differ by at most one cent.
    pub fn approx_eq(self, other: Self) -> bool {
        (self - other).abs() <= Self::EPSILON
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A zero reached through subtraction may carry a negative sign.
        let value = if self.0.is_zero() { Decimal::ZERO } else { self.0 };
        write!(f, "{value:.2}")
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// One member's share of an expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub member: MemberId,
    pub amount_owed: Money,
}

impl Participant {
    pub fn new(member: impl Into<MemberId>, amount_owed: Money) -> Self {
        Self {
            member: member.into(),
            amount_owed,
        }
    }
}

/// An expense fronted by `payer` and owed back by `participants`.
///
/// The participant shares are expected to sum to `amount` within one cent.
/// The payer may appear among the participants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub payer: MemberId,
    pub amount: Money,
    pub participants: Vec<Participant>,
}

impl ExpenseRecord {
    pub fn new(
        payer: impl Into<MemberId>,
        amount: Money,
        participants: impl IntoIterator<Item = Participant>,
    ) -> Self {
        Self {
            payer: payer.into(),
            amount,
            participants: participants.into_iter().collect(),
        }
    }

    pub fn share_total(&self) -> Money {
        self.participants.iter().map(|p| p.amount_owed).sum()
    }
}

/// Money already moved from `payer` to `payee` outside the expense ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementRecord {
    pub payer: MemberId,
    pub payee: MemberId,
    pub amount: Money,
}

impl SettlementRecord {
    pub fn new(payer: impl Into<MemberId>, payee: impl Into<MemberId>, amount: Money) -> Self {
        Self {
            payer: payer.into(),
            payee: payee.into(),
            amount,
        }
    }
}

/// Net position of a member: positive is owed money, negative owes money.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Balance {
    pub member: MemberId,
    pub net_balance: Money,
}

impl Balance {
    pub fn new(member: impl Into<MemberId>, net_balance: Money) -> Self {
        Self {
            member: member.into(),
            net_balance,
        }
    }
}

/// Suggested payment from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplifiedTransfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

impl SimplifiedTransfer {
    pub fn new(from: impl Into<MemberId>, to: impl Into<MemberId>, amount: Money) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}
