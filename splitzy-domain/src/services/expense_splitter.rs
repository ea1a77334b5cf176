use crate::{
    error::InvalidInput,
    model::{Money, OwedAmounts, Participant},
};
use fxhash::FxHashSet;

/// Equal-split service for a single bill.
pub struct ExpenseSplitter;

impl ExpenseSplitter {
    /// Computes what every participant owes the payer for one bill.
    ///
    /// The payer owes zero; everyone else owes `amount / participants.len()`,
    /// quantized to [`Money::SHARE_SCALE`]. The result keeps participant order.
    ///
    /// # Errors
    /// [`InvalidInput`] when the amount is not positive or above
    /// [`Money::MAX_AMOUNT`], the participant list is empty or has a repeated
    /// name, or the payer is not listed.
    pub fn split(
        &self,
        amount: Money,
        participants: &[Participant],
        payer: &Participant,
    ) -> Result<OwedAmounts, InvalidInput> {
        if !amount.is_positive() {
            return Err(InvalidInput::NonPositiveAmount(amount));
        }
        if amount > Money::MAX_AMOUNT {
            return Err(InvalidInput::AmountTooLarge(amount));
        }
        if participants.is_empty() {
            return Err(InvalidInput::NoParticipants);
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for participant in participants {
            if !seen.insert(participant.as_str()) {
                return Err(InvalidInput::DuplicateParticipant(participant.clone()));
            }
        }
        if !seen.contains(payer.as_str()) {
            return Err(InvalidInput::PayerNotParticipant(payer.clone()));
        }

        let share = amount
            .share_of(participants.len())
            .ok_or(InvalidInput::NoParticipants)?;

        Ok(participants
            .iter()
            .map(|participant| {
                let owed = if participant == payer {
                    Money::ZERO
                } else {
                    share
                };
                (participant.clone(), owed)
            })
            .collect())
    }
}
