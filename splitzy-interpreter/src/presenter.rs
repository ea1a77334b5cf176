use rust_decimal::{Decimal, RoundingStrategy};
use splitzy_application::{PersonBalance, Report, ReportKind};
use splitzy_domain::{Money, SettlementTransaction};
use std::fmt::Write;

const DISPLAY_SCALE: u32 = 2;

/// Plain-text rendering of script reports.
pub struct ReportPresenter;

impl ReportPresenter {
    pub fn render(report: &Report) -> String {
        let mut out = String::new();
        match report.line {
            Some(line) => {
                let _ = writeln!(out, "== line {line} ==");
            }
            None => out.push_str("== final ==\n"),
        }

        match &report.kind {
            ReportKind::Balances(balances) => render_balances(&mut out, balances),
            ReportKind::Settlement(settlement) => {
                render_balances(&mut out, &settlement.balances);
                render_transactions(&mut out, &settlement.transactions);
            }
        }
        out
    }
}

fn render_balances(out: &mut String, balances: &[PersonBalance]) {
    out.push_str("Balances:\n");
    if balances.is_empty() {
        out.push_str("  (no participants)\n");
        return;
    }

    let width = name_width(balances.iter().map(|entry| entry.participant.as_str()));
    for entry in balances {
        let _ = writeln!(
            out,
            "  {name:<width$}  {amount}",
            name = entry.participant.as_str(),
            amount = signed(entry.balance),
        );
    }
}

fn render_transactions(out: &mut String, transactions: &[SettlementTransaction]) {
    out.push_str("Settlement:\n");
    if transactions.is_empty() {
        out.push_str("  Everyone is settled up.\n");
        return;
    }

    for tx in transactions {
        let _ = writeln!(
            out,
            "  {from} -> {to}: {amount} {currency}",
            from = tx.from,
            to = tx.to,
            amount = rounded(tx.amount),
            currency = tx.currency,
        );
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|name| name.chars().count()).max().unwrap_or(0)
}

fn rounded(amount: Money) -> Decimal {
    amount
        .as_decimal()
        .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

fn signed(amount: Money) -> String {
    let value = rounded(amount);
    if value.is_sign_positive() && !value.is_zero() {
        format!("+{value}")
    } else if value.is_zero() {
        "0".to_string()
    } else {
        value.to_string()
    }
}
