use crate::model::{Money, Participant};

/// Malformed arguments handed to the expense splitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("Amount must be positive (found {0})")]
    NonPositiveAmount(Money),
    #[error(
        "Amount {0} exceeds the per-expense limit of {max}",
        max = Money::MAX_AMOUNT
    )]
    AmountTooLarge(Money),
    #[error("At least one participant is required")]
    NoParticipants,
    #[error("Payer '{0}' is not among the participants")]
    PayerNotParticipant(Participant),
    #[error("Participant '{0}' is listed more than once")]
    DuplicateParticipant(Participant),
}
