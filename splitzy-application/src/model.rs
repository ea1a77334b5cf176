use splitzy_domain::{CurrencyCode, Money, Participant, SessionId, SettlementTransaction};

/// Validated form input for one bill, before it is split.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub kind: String,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub participants: Vec<Participant>,
    pub payer: Participant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PersonBalance {
    pub participant: Participant,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SettlementResult {
    pub balances: Vec<PersonBalance>,
    pub transactions: Vec<SettlementTransaction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Balances,
    Settle,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptStatement {
    Session(SessionId),
    Members(Vec<Participant>),
    Expense(NewExpense),
    Command(Command),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptStatementWithLine {
    pub line: usize,
    pub statement: ScriptStatement,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    statements: Vec<ScriptStatementWithLine>,
}

impl Script {
    pub fn new(statements: Vec<ScriptStatementWithLine>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[ScriptStatementWithLine] {
        &self.statements
    }

    /// Session named by a leading `session` statement, if any.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.statements.iter().find_map(|stmt| match &stmt.statement {
            ScriptStatement::Session(id) => Some(id),
            _ => None,
        })
    }

    pub fn has_commands(&self) -> bool {
        self.statements
            .iter()
            .any(|stmt| matches!(stmt.statement, ScriptStatement::Command(_)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportKind {
    Balances(Vec<PersonBalance>),
    Settlement(SettlementResult),
}

/// Output produced while running a script. `line` is `None` for the summary
/// emitted when a script has no commands.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub line: Option<usize>,
    pub kind: ReportKind,
}
