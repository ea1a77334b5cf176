use crate::model::{ExpenseRecord, Money, NetBalances, Participant};

/// Folds expense records into per-participant net balances.
pub struct BalanceNetter;

impl BalanceNetter {
    /// Net balance of everyone named in `expenses`.
    ///
    /// Each owed share credits the payer and debits the owee by the same
    /// amount, so the values always sum to zero. Every payer and owee gets an
    /// entry, even when it nets to zero.
    pub fn net_balances(&self, expenses: &[ExpenseRecord]) -> NetBalances {
        let mut balances = NetBalances::new();
        for expense in expenses {
            apply_expense(&mut balances, expense);
        }
        balances
    }
}

/// Applies one record to a running balance table.
fn apply_expense(balances: &mut NetBalances, expense: &ExpenseRecord) {
    let payer = expense.payer();
    adjust(balances, payer, Money::ZERO);

    for (owee, owed) in expense.owed_amounts() {
        adjust(balances, owee, -*owed);
        adjust(balances, payer, *owed);
    }
}

fn adjust(balances: &mut NetBalances, member: &Participant, delta: Money) {
    match balances.get_mut(member.as_str()) {
        Some(balance) => *balance += delta,
        None => {
            balances.insert(member.clone(), delta);
        }
    }
}
