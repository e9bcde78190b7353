use thiserror::Error;

use crate::authority::AuthorityError;
use crate::catalog::CardId;
use crate::deck::UnknownCardError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please fill out the {0} field")]
    MissingField(&'static str),
    #[error("no character loaded")]
    NoCharacter,
    #[error("choose a stat first")]
    NoStatChosen,
    #[error("please select a card to cast a spell")]
    NoCardSelected,
    #[error("card {0} is not in your hand")]
    CardNotInHand(CardId),
    #[error("card {0} is not in the catalog")]
    UnknownCard(CardId),
    #[error("a round is already in flight")]
    RoundInFlight,
    #[error("a fight is already in progress")]
    CombatAlreadyActive,
    #[error("no fight in progress")]
    NoActiveCombat,
    #[error("combat has ended")]
    CombatEnded,
    #[error("a card draw is already pending")]
    DrawPending,
    #[error("no card draw is pending")]
    NoDrawPending,
    #[error("all stat boosts have been applied")]
    BoostLocked,
    #[error("discarded a response that does not match the request in flight")]
    StaleResponse,
    #[error(transparent)]
    InvalidDeck(#[from] UnknownCardError),
    #[error(transparent)]
    Authority(#[from] AuthorityError),
}

impl SessionError {
    /// True for failures detected before any request was made.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            SessionError::Authority(_) | SessionError::StaleResponse | SessionError::InvalidDeck(_)
        )
    }
}
