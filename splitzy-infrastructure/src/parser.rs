use splitzy_application::{
    Command, NewExpense, Script, ScriptParseError, ScriptParser, ScriptStatement,
    ScriptStatementWithLine,
};
use splitzy_domain::{CurrencyCode, Money, Participant, SessionId};
use splitzy_parser::{
    Command as ParserCommand, ParseError, Payment, Statement as ParserStatement, parse_program,
};

/// Category given to expenses written without a `#tag`.
pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Default)]
pub struct SplitzyScriptParser;

impl ScriptParser for SplitzyScriptParser {
    fn parse(
        &self,
        content: &str,
        default_currency: &CurrencyCode,
    ) -> Result<Script, ScriptParseError> {
        let program = parse_program(content).map_err(|err| match err {
            ParseError::SyntaxError { line, detail } => {
                ScriptParseError::SyntaxError { line, detail }
            }
            ParseError::MisplacedSession { line } => ScriptParseError::MisplacedSession { line },
        })?;

        let statements = program
            .statements
            .into_iter()
            .map(|stmt| {
                let splitzy_parser::StatementWithLine { line, statement } = stmt;
                let statement = match statement {
                    ParserStatement::Session(id) => ScriptStatement::Session(SessionId::new(id)),
                    ParserStatement::Members(names) => {
                        ScriptStatement::Members(to_participants(&names))
                    }
                    ParserStatement::Payment(payment) => {
                        ScriptStatement::Expense(to_new_expense(payment, default_currency))
                    }
                    ParserStatement::Command(ParserCommand::Balances) => {
                        ScriptStatement::Command(Command::Balances)
                    }
                    ParserStatement::Command(ParserCommand::Settle) => {
                        ScriptStatement::Command(Command::Settle)
                    }
                };
                ScriptStatementWithLine { line, statement }
            })
            .collect();

        Ok(Script::new(statements))
    }
}

fn to_participants(names: &[&str]) -> Vec<Participant> {
    names.iter().copied().map(Participant::new).collect()
}

fn to_new_expense(payment: Payment<'_>, default_currency: &CurrencyCode) -> NewExpense {
    let Payment {
        payer,
        amount,
        currency,
        participants,
        category,
    } = payment;

    NewExpense {
        kind: category.unwrap_or(DEFAULT_CATEGORY).to_string(),
        amount: Money::from_decimal(amount),
        currency: currency.map_or_else(|| default_currency.clone(), CurrencyCode::new),
        participants: to_participants(&participants),
        payer: Participant::new(payer),
    }
}
