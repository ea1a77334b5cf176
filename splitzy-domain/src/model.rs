use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use indexmap::{IndexMap, IndexSet};
use rust_decimal::{Decimal, RoundingStrategy};
use smol_str::SmolStr;

use crate::{error::InvalidInput, services::ExpenseSplitter};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Owed share per participant, in the participant order of the expense.
pub type OwedAmounts = IndexMap<Participant, Money>;

/// Net position per participant (positive: is owed money, negative: owes money).
///
/// A `BTreeMap` keeps iteration in name order, which the settlement planner
/// relies on for its tie-break.
pub type NetBalances = BTreeMap<Participant, Money>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Decimal places kept on an equal-split share.
    ///
    /// Shares are quantized once at split time; every later sum and difference
    /// stays exact, so balances conserve to exactly zero.
    pub const SHARE_SCALE: u32 = 12;

    /// Largest amount a single expense may carry (10^15).
    ///
    /// With shares at [`Money::SHARE_SCALE`] places, a balance stays exact up
    /// to about 7.9e16, i.e. dozens of expenses at the cap per participant.
    pub const MAX_AMOUNT: Self =
        Self(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

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

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Equal share of `self` across `parts`, rounded half-to-even at
    /// [`Money::SHARE_SCALE`]. Returns `None` when `parts` is zero.
    pub fn share_of(self, parts: usize) -> Option<Self> {
        let share = self.0.checked_div(Decimal::from(parts))?;
        Some(Self(share.round_dp_with_strategy(
            Self::SHARE_SCALE,
            RoundingStrategy::MidpointNearestEven,
        )))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
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

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Participant(SmolStr);

impl Participant {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref().trim()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for Participant {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Participant {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency code as entered; the engine never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode(SmolStr);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code.as_ref().trim().to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(SmolStr);

impl SessionId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id.as_ref().trim()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged bill. Built through [`ExpenseRecord::new`], which derives the
/// owed amounts, and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseRecord {
    kind: SmolStr,
    amount: Money,
    currency: CurrencyCode,
    participants: Vec<Participant>,
    payer: Participant,
    owed_amounts: OwedAmounts,
}

impl ExpenseRecord {
    pub fn new(
        kind: impl AsRef<str>,
        amount: Money,
        currency: CurrencyCode,
        participants: Vec<Participant>,
        payer: Participant,
    ) -> Result<Self, InvalidInput> {
        let owed_amounts = ExpenseSplitter.split(amount, &participants, &payer)?;
        Ok(Self {
            kind: SmolStr::new(kind.as_ref().trim()),
            amount,
            currency,
            participants,
            payer,
            owed_amounts,
        })
    }

    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn payer(&self) -> &Participant {
        &self.payer
    }

    pub fn owed_amounts(&self) -> &OwedAmounts {
        &self.owed_amounts
    }

    /// True when both names took part in this expense.
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        self.owed_amounts.contains_key(a) && self.owed_amounts.contains_key(b)
    }
}

/// Suggested payment from a net debtor to a net creditor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementTransaction {
    pub from: Participant,
    pub to: Participant,
    pub amount: Money,
    pub currency: CurrencyCode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerContext {
    /// Currency assigned to a transaction when no expense involves the pair
    /// and no earlier transaction exists.
    pub default_currency: CurrencyCode,
}

impl Default for PlannerContext {
    fn default() -> Self {
        Self {
            default_currency: CurrencyCode::default(),
        }
    }
}

/// A bill-splitting context: its expenses plus everyone who took part.
///
/// `participants` is a cache of registered names and every expense's
/// participants, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    id: SessionId,
    expenses: Vec<ExpenseRecord>,
    registered: IndexSet<Participant>,
    participants: IndexSet<Participant>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            expenses: Vec::new(),
            registered: IndexSet::new(),
            participants: IndexSet::new(),
        }
    }

    pub fn from_parts<I>(id: SessionId, registered: I, expenses: Vec<ExpenseRecord>) -> Self
    where
        I: IntoIterator<Item = Participant>,
    {
        let mut session = Self {
            id,
            expenses,
            registered: registered.into_iter().collect(),
            participants: IndexSet::new(),
        };
        session.rebuild_participants();
        session
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn participants(&self) -> &IndexSet<Participant> {
        &self.participants
    }

    /// Names added explicitly, independent of any expense.
    pub fn registered_participants(&self) -> &IndexSet<Participant> {
        &self.registered
    }

    /// Returns false when the name was already registered.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        self.participants.insert(participant.clone());
        self.registered.insert(participant)
    }

    pub fn push_expense(&mut self, expense: ExpenseRecord) {
        self.participants.extend(expense.participants().iter().cloned());
        self.expenses.push(expense);
    }

    pub fn remove_expense(&mut self, index: usize) -> Option<ExpenseRecord> {
        if index >= self.expenses.len() {
            return None;
        }
        let removed = self.expenses.remove(index);
        self.rebuild_participants();
        Some(removed)
    }

    fn rebuild_participants(&mut self) {
        let mut participants = self.registered.clone();
        for expense in &self.expenses {
            participants.extend(expense.participants().iter().cloned());
        }
        self.participants = participants;
    }
}
