use crate::{
    error::LedgerError,
    model::{NewExpense, PersonBalance, SettlementResult},
    ports::SessionStore,
};
use splitzy_domain::{
    BalanceNetter, ExpenseRecord, NetBalances, Participant, PlannerContext, Session, SessionId,
    SettlementPlanner,
};

/// Session-level entry point: records expenses through the splitter and
/// answers balance and settlement queries from the stored expense list.
///
/// Balances and plans are recomputed from scratch on every query.
pub struct ExpenseLedger<'a> {
    store: &'a dyn SessionStore,
    planner: SettlementPlanner,
}

impl<'a> ExpenseLedger<'a> {
    pub fn new(store: &'a dyn SessionStore, context: PlannerContext) -> Self {
        Self {
            store,
            planner: SettlementPlanner::new(context),
        }
    }

    /// Loads `id`, creating and saving an empty session when it is missing.
    pub fn open_session(&self, id: &SessionId) -> Result<Session, LedgerError> {
        if let Some(session) = self.store.load(id)? {
            return Ok(session);
        }

        let session = Session::new(id.clone());
        self.store.save(&session)?;
        tracing::info!(session_id = %id, "Session created");
        Ok(session)
    }

    pub fn session(&self, id: &SessionId) -> Result<Session, LedgerError> {
        self.store
            .load(id)?
            .ok_or_else(|| LedgerError::SessionNotFound(id.clone()))
    }

    pub fn record_expense(
        &self,
        id: &SessionId,
        expense: NewExpense,
    ) -> Result<ExpenseRecord, LedgerError> {
        let mut session = self.session(id)?;
        let NewExpense {
            kind,
            amount,
            currency,
            participants,
            payer,
        } = expense;

        let record = ExpenseRecord::new(kind, amount, currency, participants, payer).inspect_err(
            |err| {
                tracing::debug!(session_id = %id, error = %err, "Expense rejected");
            },
        )?;
        session.push_expense(record.clone());
        self.store.save(&session)?;

        tracing::debug!(
            session_id = %id,
            payer = %record.payer(),
            amount = %record.amount(),
            currency = %record.currency(),
            participant_count = record.participants().len(),
            expense_count = session.expenses().len(),
            "Expense recorded"
        );
        Ok(record)
    }

    pub fn remove_expense(
        &self,
        id: &SessionId,
        index: usize,
    ) -> Result<ExpenseRecord, LedgerError> {
        let mut session = self.session(id)?;
        let removed = session
            .remove_expense(index)
            .ok_or_else(|| LedgerError::ExpenseNotFound {
                session_id: id.clone(),
                index,
            })?;
        self.store.save(&session)?;

        tracing::debug!(
            session_id = %id,
            index,
            expense_count = session.expenses().len(),
            "Expense removed"
        );
        Ok(removed)
    }

    /// Returns false when the participant was already registered.
    pub fn add_participant(
        &self,
        id: &SessionId,
        participant: Participant,
    ) -> Result<bool, LedgerError> {
        let mut session = self.session(id)?;
        let added = session.add_participant(participant);
        if added {
            self.store.save(&session)?;
        }
        Ok(added)
    }

    /// Net balance per participant, in name order.
    ///
    /// Registered participants without expenses are listed at zero.
    pub fn balances(&self, id: &SessionId) -> Result<Vec<PersonBalance>, LedgerError> {
        let session = self.session(id)?;
        Ok(person_balances(&session, &self.net_balances(&session)))
    }

    pub fn settlement(&self, id: &SessionId) -> Result<SettlementResult, LedgerError> {
        let session = self.session(id)?;
        let net = self.net_balances(&session);
        let transactions = self.planner.simplify(&net, session.expenses());

        tracing::debug!(
            session_id = %id,
            expense_count = session.expenses().len(),
            transaction_count = transactions.len(),
            "Settlement planned"
        );

        Ok(SettlementResult {
            balances: person_balances(&session, &net),
            transactions,
        })
    }

    fn net_balances(&self, session: &Session) -> NetBalances {
        BalanceNetter.net_balances(session.expenses())
    }
}

fn person_balances(session: &Session, net: &NetBalances) -> Vec<PersonBalance> {
    let mut all = net.clone();
    for participant in session.participants() {
        all.entry(participant.clone()).or_default();
    }

    all.into_iter()
        .map(|(participant, balance)| PersonBalance {
            participant,
            balance,
        })
        .collect()
}
