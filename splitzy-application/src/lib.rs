#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod expense_ledger;
pub mod model;
pub mod ports;
pub mod script_processor;
#[cfg(test)]
mod test_utils;

pub use error::{LedgerError, ScriptParseError, ScriptRunError, StoreError};
pub use expense_ledger::ExpenseLedger;
pub use model::{
    Command, NewExpense, PersonBalance, Report, ReportKind, Script, ScriptStatement,
    ScriptStatementWithLine, SettlementResult,
};
pub use ports::{ScriptParser, SessionStore};
pub use script_processor::ScriptProcessor;
