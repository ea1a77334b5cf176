#![warn(clippy::uninlined_format_args)]

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while1},
    character::complete::{alpha1, char, digit1, multispace1, space0, space1},
    combinator::{opt, recognize, verify},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Payment<'a> {
    pub payer: &'a str,
    pub amount: Decimal,
    /// Currency written after the amount; `None` means the configured default.
    pub currency: Option<&'a str>,
    pub participants: Vec<&'a str>,
    pub category: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Balances,
    Settle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Session(&'a str),
    Members(Vec<&'a str>),
    Payment(Payment<'a>),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("`session` must be the first statement and appear only once (line {line})")]
    MisplacedSession { line: usize },
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

fn session_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))(input)
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn block_comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, block_comment, line_comment)))).parse(input)
}

// Names are separated by whitespace, a comma, or both.
fn name_separator(input: &str) -> IResult<&str, &str> {
    alt((recognize((space0, char(','), space0)), space1)).parse(input)
}

fn name_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(name_separator, name).parse(input)
}

fn amount(input: &str) -> IResult<&str, Decimal> {
    recognize((digit1, opt((char('.'), digit1))))
        .map_res(|digits: &str| digits.parse::<Decimal>())
        .parse(input)
}

// Three letters, so `for` has to be ruled out explicitly.
fn currency(input: &str) -> IResult<&str, &str> {
    verify(alpha1, |code: &str| {
        code.len() == 3 && !code.eq_ignore_ascii_case("for")
    })
    .parse(input)
}

fn category(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), name).parse(input)
}

// {payer} paid {amount} [{currency}] for {participants} [#{category}]
fn payment(input: &str) -> IResult<&str, Payment<'_>> {
    (
        name, // payer
        sp,
        tag_no_case("paid"),
        sp,
        amount,
        opt(preceded(space1, currency)),
        sp,
        tag_no_case("for"),
        space1,
        name_list, // participants
        opt(preceded(space0, category)),
    )
        .map(
            |(payer, _, _, _, amount, currency, _, _, _, participants, category)| Payment {
                payer,
                amount,
                currency,
                participants,
                category,
            },
        )
        .parse(input)
}

fn session(input: &str) -> IResult<&str, &str> {
    (tag_no_case("session"), space1, session_name)
        .map(|(_, _, id)| id)
        .parse(input)
}

fn members(input: &str) -> IResult<&str, Vec<&str>> {
    (tag_no_case("members"), space1, name_list)
        .map(|(_, _, names)| names)
        .parse(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        tag_no_case("!balances").map(|_| Command::Balances),
        tag_no_case("!settle").map(|_| Command::Settle),
    ))
    .parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    // Payments go first so a participant called "members" or "session" can still pay.
    alt((
        payment.map(Statement::Payment),
        session.map(Statement::Session),
        members.map(Statement::Members),
        command.map(Statement::Command),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

fn syntax_error_detail(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near = e.input.trim();
            if near.is_empty() {
                "unexpected end of line".to_string()
            } else {
                format!("unexpected input near '{near}'")
            }
        }
    }
}

/// Parses a ledger script line by line. Blank lines and comments are skipped;
/// line numbers in the result and in errors are 1-based.
pub fn parse_program(input: &str) -> Result<Program<'_>, ParseError> {
    let mut statements: Vec<StatementWithLine<'_>> = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }

        let (rest, stmt) = statement_with_sp(rest).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: syntax_error_detail(e),
        })?;
        if !rest.trim().is_empty() {
            return Err(ParseError::SyntaxError {
                line: line_no,
                detail: format!("unparsed input '{}'", rest.trim()),
            });
        }
        if matches!(stmt, Statement::Session(_)) && !statements.is_empty() {
            return Err(ParseError::MisplacedSession { line: line_no });
        }

        statements.push(StatementWithLine {
            line: line_no,
            statement: stmt,
        });
    }

    Ok(Program { statements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[rstest]
    #[case::integer("90", "90")]
    #[case::cents("12.50", "12.5")]
    #[case::leading_zero("0.01", "0.01")]
    fn test_amount(#[case] input: &str, #[case] expected: &str) {
        let (rest, value) = amount(input).unwrap();
        assert_eq!(rest, "");
        assert_eq!(value, dec(expected));
    }

    #[rstest]
    #[case::space("Alice Bob  Carol", vec!["Alice", "Bob", "Carol"])]
    #[case::comma("Alice,Bob, Carol", vec!["Alice", "Bob", "Carol"])]
    #[case::single("Alice", vec!["Alice"])]
    fn test_name_list(#[case] input: &str, #[case] expected: Vec<&str>) {
        let (rest, names) = name_list(input).unwrap();
        assert_eq!(rest, "");
        assert_eq!(names, expected);
    }

    #[rstest]
    #[case::full(
        "Alice paid 90 EUR for Alice Bob Carol #dinner",
        Payment {
            payer: "Alice",
            amount: dec("90"),
            currency: Some("EUR"),
            participants: vec!["Alice", "Bob", "Carol"],
            category: Some("dinner"),
        }
    )]
    #[case::defaults(
        "Bob paid 12.50 for Bob, Carol",
        Payment {
            payer: "Bob",
            amount: dec("12.50"),
            currency: None,
            participants: vec!["Bob", "Carol"],
            category: None,
        }
    )]
    #[case::lowercase_currency(
        "Carol PAID 3 jpy FOR Carol Dave",
        Payment {
            payer: "Carol",
            amount: dec("3"),
            currency: Some("jpy"),
            participants: vec!["Carol", "Dave"],
            category: None,
        }
    )]
    fn test_payment(#[case] input: &str, #[case] expected: Payment<'_>) {
        let (rest, parsed) = payment(input).unwrap();
        assert_eq!(rest, "");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case::balances("!balances", Statement::Command(Command::Balances))]
    #[case::settle("!SETTLE", Statement::Command(Command::Settle))]
    #[case::session("session rome-trip.2024", Statement::Session("rome-trip.2024"))]
    #[case::members("members Alice, Bob", Statement::Members(vec!["Alice", "Bob"]))]
    fn test_statement(#[case] input: &str, #[case] expected: Statement<'_>) {
        let (_, stmt) = statement(input).unwrap();
        assert_eq!(stmt, expected);
    }

    #[test]
    fn test_member_named_like_keyword_can_pay() {
        let (_, stmt) = statement("members paid 5 for members Bob").unwrap();
        let Statement::Payment(payment) = stmt else {
            panic!("expected payment");
        };
        assert_eq!(payment.payer, "members");
        assert_eq!(payment.participants, vec!["members", "Bob"]);
    }

    #[test]
    fn test_parse_program_tracks_lines_and_skips_comments() {
        let input = "\
session rome
// everyone in the flat
members Alice Bob Carol

Alice paid 90 EUR for Alice Bob Carol #dinner // split three ways
/* shared taxi */ Bob paid 12.50 for Bob Carol
!balances
!settle
";
        let program = parse_program(input).unwrap();

        let lines: Vec<usize> = program.statements.iter().map(|stmt| stmt.line).collect();
        assert_eq!(lines, vec![1, 3, 5, 6, 7, 8]);
        assert_eq!(program.statements[0].statement, Statement::Session("rome"));
        assert!(matches!(
            program.statements[3].statement,
            Statement::Payment(Payment {
                payer: "Bob",
                ..
            })
        ));
    }

    #[rstest]
    #[case::missing_for("Alice paid 10 Bob", 1)]
    #[case::negative_amount("Alice paid -10 for Bob", 1)]
    #[case::trailing_garbage("!settle\n!balances now", 2)]
    #[case::four_letter_currency("Alice paid 10 EURO for Alice", 1)]
    #[case::unknown_command("!undo", 1)]
    fn test_syntax_errors_report_line(#[case] input: &str, #[case] expected_line: usize) {
        let err = parse_program(input).unwrap_err();
        assert!(
            matches!(err, ParseError::SyntaxError { line, .. } if line == expected_line),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    #[case::after_payment("Alice paid 1 for Alice\nsession late", 2)]
    #[case::twice("session a\nsession b", 2)]
    fn test_session_must_lead(#[case] input: &str, #[case] expected_line: usize) {
        assert_eq!(
            parse_program(input),
            Err(ParseError::MisplacedSession {
                line: expected_line
            })
        );
    }

    #[test]
    fn test_session_after_comments_is_accepted() {
        let program = parse_program("// header\n\nsession trip").unwrap();
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.statements[0].line, 3);
    }
}
