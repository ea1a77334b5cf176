use crate::{
    error::{LedgerError, ScriptParseError, ScriptRunError},
    expense_ledger::ExpenseLedger,
    model::{Command, Report, ReportKind, Script, ScriptStatement},
    ports::ScriptParser,
};
use splitzy_domain::{CurrencyCode, SessionId};

/// Parses ledger scripts and replays them against an [`ExpenseLedger`].
#[derive(Clone, Copy)]
pub struct ScriptProcessor<'a> {
    parser: &'a dyn ScriptParser,
    ledger: &'a ExpenseLedger<'a>,
}

impl<'a> ScriptProcessor<'a> {
    pub fn new(parser: &'a dyn ScriptParser, ledger: &'a ExpenseLedger<'a>) -> Self {
        Self { parser, ledger }
    }

    pub fn parse(
        &self,
        content: &str,
        default_currency: &CurrencyCode,
    ) -> Result<Script, ScriptParseError> {
        self.parser.parse(content, default_currency).inspect_err(|err| {
            tracing::debug!(error = %err, "Script rejected");
        })
    }

    /// Applies every statement in order and collects the requested reports.
    ///
    /// Statements are applied on top of whatever the session already holds.
    /// A script without commands yields a single settlement report for the
    /// final state.
    pub fn run(
        &self,
        script: &Script,
        default_session: &SessionId,
    ) -> Result<Vec<Report>, ScriptRunError> {
        let session_line = script
            .statements()
            .iter()
            .find(|stmt| matches!(stmt.statement, ScriptStatement::Session(_)))
            .map_or(0, |stmt| stmt.line);
        let session_id = script.session_id().unwrap_or(default_session);
        self.ledger
            .open_session(session_id)
            .map_err(|source| ScriptRunError {
                line: session_line,
                source,
            })?;

        let mut reports = Vec::new();
        for stmt in script.statements() {
            let at_line = |source: LedgerError| ScriptRunError {
                line: stmt.line,
                source,
            };

            match &stmt.statement {
                ScriptStatement::Session(_) => {}
                ScriptStatement::Members(members) => {
                    for member in members {
                        self.ledger
                            .add_participant(session_id, member.clone())
                            .map_err(at_line)?;
                    }
                }
                ScriptStatement::Expense(expense) => {
                    self.ledger
                        .record_expense(session_id, expense.clone())
                        .map_err(at_line)?;
                }
                ScriptStatement::Command(Command::Balances) => {
                    let balances = self.ledger.balances(session_id).map_err(at_line)?;
                    reports.push(Report {
                        line: Some(stmt.line),
                        kind: ReportKind::Balances(balances),
                    });
                }
                ScriptStatement::Command(Command::Settle) => {
                    let settlement = self.ledger.settlement(session_id).map_err(at_line)?;
                    reports.push(Report {
                        line: Some(stmt.line),
                        kind: ReportKind::Settlement(settlement),
                    });
                }
            }
        }

        if !script.has_commands() {
            let settlement = self
                .ledger
                .settlement(session_id)
                .map_err(|source| ScriptRunError { line: 0, source })?;
            reports.push(Report {
                line: None,
                kind: ReportKind::Settlement(settlement),
            });
        }

        tracing::info!(
            session_id = %session_id,
            statement_count = script.statements().len(),
            report_count = reports.len(),
            "Script applied"
        );
        Ok(reports)
    }
}
