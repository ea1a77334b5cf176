use crate::model::{
    CurrencyCode, ExpenseRecord, Money, NetBalances, Participant, PlannerContext,
    SettlementTransaction,
};

/// Greedy largest-balance settlement planning service.
#[derive(Default)]
pub struct SettlementPlanner {
    context: PlannerContext,
}

struct Position<'a> {
    member: &'a Participant,
    balance: Money,
}

impl SettlementPlanner {
    pub fn new(context: PlannerContext) -> Self {
        Self { context }
    }

    /// Builds the payments that zero out `balances`.
    ///
    /// Participants are ranked by balance, largest creditor first; equal
    /// balances keep name order. Each creditor is paid by the debtors ranked
    /// after it until its balance reaches zero, so every transaction clears at
    /// least one side and `n` non-zero balances need at most `n - 1` payments.
    ///
    /// A transaction takes the currency of the first expense both sides took
    /// part in, else the currency of the previous transaction, else the
    /// configured default. This is a heuristic: netting ignores currency, so a
    /// plan over mixed-currency expenses carries no exchange semantics.
    pub fn simplify(
        &self,
        balances: &NetBalances,
        expenses: &[ExpenseRecord],
    ) -> Vec<SettlementTransaction> {
        let mut positions: Vec<Position<'_>> = balances
            .iter()
            .map(|(member, balance)| Position {
                member,
                balance: *balance,
            })
            .collect();
        // Stable sort over name-ordered input: ties stay lexicographic.
        positions.sort_by(|a, b| b.balance.cmp(&a.balance));

        let mut transactions = Vec::new();
        let mut last_currency: Option<CurrencyCode> = None;

        for idx in 0..positions.len() {
            let (head, tail) = positions.split_at_mut(idx + 1);
            let creditor = &mut head[idx];
            if !creditor.balance.is_positive() {
                continue;
            }

            for debtor in tail.iter_mut() {
                if !debtor.balance.is_negative() {
                    continue;
                }

                let amount = creditor.balance.min(-debtor.balance);
                let currency = currency_for_pair(expenses, creditor.member, debtor.member)
                    .or_else(|| last_currency.clone())
                    .unwrap_or_else(|| self.context.default_currency.clone());

                creditor.balance -= amount;
                debtor.balance += amount;
                last_currency = Some(currency.clone());
                transactions.push(SettlementTransaction {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount,
                    currency,
                });

                if creditor.balance.is_zero() {
                    break;
                }
            }
        }

        transactions
    }
}

fn currency_for_pair(
    expenses: &[ExpenseRecord],
    creditor: &Participant,
    debtor: &Participant,
) -> Option<CurrencyCode> {
    expenses
        .iter()
        .find(|expense| expense.involves_pair(creditor.as_str(), debtor.as_str()))
        .map(|expense| expense.currency().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::BalanceNetter;
    use rstest::{fixture, rstest};

    #[fixture]
    fn planner() -> SettlementPlanner {
        SettlementPlanner::default()
    }

    fn balances(entries: &[(&str, i64)]) -> NetBalances {
        entries
            .iter()
            .map(|(name, amount)| (Participant::new(name), Money::from_i64(*amount)))
            .collect()
    }

    fn expense(payer: &str, amount: i64, currency: &str, participants: &[&str]) -> ExpenseRecord {
        ExpenseRecord::new(
            "general",
            Money::from_i64(amount),
            CurrencyCode::new(currency),
            participants.iter().copied().map(Participant::from).collect(),
            Participant::new(payer),
        )
        .expect("valid expense")
    }

    fn as_tuples(transactions: &[SettlementTransaction]) -> Vec<(&str, &str, Money, &str)> {
        transactions
            .iter()
            .map(|tx| {
                (
                    tx.from.as_str(),
                    tx.to.as_str(),
                    tx.amount,
                    tx.currency.as_str(),
                )
            })
            .collect()
    }

    #[rstest]
    #[case::empty(&[], vec![])]
    #[case::already_settled(&[("A", 0), ("B", 0)], vec![])]
    #[case::one_creditor(
        &[("A", 60), ("B", -30), ("C", -30)],
        vec![("B", "A", Money::from_i64(30), "USD"), ("C", "A", Money::from_i64(30), "USD")]
    )]
    #[case::two_creditors(
        &[("A", 50), ("B", 30), ("C", -20), ("D", -60)],
        vec![
            ("C", "A", Money::from_i64(20), "USD"),
            ("D", "A", Money::from_i64(30), "USD"),
            ("D", "B", Money::from_i64(30), "USD"),
        ]
    )]
    #[case::ties_follow_name_order(
        &[("Bob", 10), ("Alice", 10), ("Carol", -20)],
        vec![
            ("Carol", "Alice", Money::from_i64(10), "USD"),
            ("Carol", "Bob", Money::from_i64(10), "USD"),
        ]
    )]
    #[case::zero_balance_ignored(
        &[("A", 25), ("B", 0), ("C", -25)],
        vec![("C", "A", Money::from_i64(25), "USD")]
    )]
    fn simplify_without_expense_history(
        planner: SettlementPlanner,
        #[case] entries: &[(&str, i64)],
        #[case] expected: Vec<(&str, &str, Money, &str)>,
    ) {
        let transactions = planner.simplify(&balances(entries), &[]);
        assert_eq!(as_tuples(&transactions), expected);
    }

    #[rstest]
    fn single_expense_settles_to_payer(planner: SettlementPlanner) {
        let expenses = vec![expense("A", 90, "EUR", &["A", "B", "C"])];
        let net = BalanceNetter.net_balances(&expenses);

        let transactions = planner.simplify(&net, &expenses);

        assert_eq!(
            as_tuples(&transactions),
            vec![
                ("B", "A", Money::from_i64(30), "EUR"),
                ("C", "A", Money::from_i64(30), "EUR"),
            ]
        );
    }

    #[rstest]
    fn multi_expense_netting_settles_combined_debt(planner: SettlementPlanner) {
        let expenses = vec![
            expense("A", 60, "USD", &["A", "B", "C"]),
            expense("B", 30, "USD", &["B", "C"]),
        ];
        let net = BalanceNetter.net_balances(&expenses);

        assert_eq!(net.get("C"), Some(&Money::from_i64(-35)));

        let transactions = planner.simplify(&net, &expenses);
        assert_eq!(
            as_tuples(&transactions),
            vec![
                ("B", "A", Money::from_i64(5), "USD"),
                ("C", "A", Money::from_i64(35), "USD"),
            ]
        );
    }

    #[rstest]
    fn currency_falls_back_to_previous_transaction(planner: SettlementPlanner) {
        // A and C never shared an expense, so C's payment reuses JPY.
        let expenses = vec![
            expense("A", 20, "JPY", &["A", "B"]),
            expense("D", 40, "GBP", &["C", "D"]),
        ];
        let net = balances(&[("A", 30), ("B", -10), ("C", -20)]);

        let transactions = planner.simplify(&net, &expenses);

        assert_eq!(
            as_tuples(&transactions),
            vec![
                ("B", "A", Money::from_i64(10), "JPY"),
                ("C", "A", Money::from_i64(20), "JPY"),
            ]
        );
    }

    #[test]
    fn first_unmatched_transaction_uses_configured_default() {
        let planner = SettlementPlanner::new(PlannerContext {
            default_currency: CurrencyCode::new("chf"),
        });
        let net = balances(&[("A", 15), ("B", -15)]);

        let transactions = planner.simplify(&net, &[]);

        assert_eq!(
            as_tuples(&transactions),
            vec![("B", "A", Money::from_i64(15), "CHF")]
        );
    }

    #[rstest]
    fn simplify_leaves_input_untouched(planner: SettlementPlanner) {
        let net = balances(&[("A", 40), ("B", -40)]);
        let before = net.clone();

        let _ = planner.simplify(&net, &[]);

        assert_eq!(net, before);
    }

    #[rstest]
    fn residual_debt_produces_no_extra_transactions(planner: SettlementPlanner) {
        // Imbalanced input: B's remaining debt has no creditor left.
        let net = balances(&[("A", 10), ("B", -25)]);

        let transactions = planner.simplify(&net, &[]);

        assert_eq!(
            as_tuples(&transactions),
            vec![("B", "A", Money::from_i64(10), "USD")]
        );
    }
}
