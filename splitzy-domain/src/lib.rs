#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::InvalidInput;
pub use model::{
    CurrencyCode, DEFAULT_CURRENCY, ExpenseRecord, Money, NetBalances, OwedAmounts, Participant,
    PlannerContext, Session, SessionId, SettlementTransaction,
};
pub use services::{BalanceNetter, ExpenseSplitter, SettlementPlanner};
