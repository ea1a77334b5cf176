pub mod balance_netter;
pub mod expense_splitter;
pub mod settlement_planner;

pub use balance_netter::BalanceNetter;
pub use expense_splitter::ExpenseSplitter;
pub use settlement_planner::SettlementPlanner;
