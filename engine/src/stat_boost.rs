use tracing::{debug, info, warn};

use crate::authority::{AuthorityError, BoostRequest};
use crate::character::{Character, CharacterViewModel, StatName};
use crate::error::SessionError;
use crate::presentation::{BoostPrompt, UiEvent};

/// Number of pick-draw-apply rounds a new character gets.
pub const BOOST_ROUNDS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostPhase {
    AwaitingStat,
    AwaitingDraw { stat: StatName },
    /// Card fetch in flight.
    Drawing { stat: StatName },
    /// Card drawn, boost submission in flight.
    Applying { stat: StatName, card: u32 },
    Complete,
}

/// Post-creation stat growth: choose a stat, draw a card, apply it; twice, then locked.
///
/// The draw and the apply form one sequential unit. The apply request only exists once the
/// draw has resolved, and a failure in either step drops back to `AwaitingDraw` with the same
/// stat so the player can retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatBoostFlow {
    phase: BoostPhase,
    applied: u8,
}

impl Default for StatBoostFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl StatBoostFlow {
    pub fn new() -> Self {
        Self {
            phase: BoostPhase::AwaitingStat,
            applied: 0,
        }
    }

    /// A flow with no boosts left, for characters that did not come from creation.
    pub fn locked() -> Self {
        Self {
            phase: BoostPhase::Complete,
            applied: BOOST_ROUNDS,
        }
    }

    pub fn phase(&self) -> BoostPhase {
        self.phase
    }

    pub fn cards_applied(&self) -> u8 {
        self.applied
    }

    pub fn chosen_stat(&self) -> Option<StatName> {
        match self.phase {
            BoostPhase::AwaitingDraw { stat }
            | BoostPhase::Drawing { stat }
            | BoostPhase::Applying { stat, .. } => Some(stat),
            BoostPhase::AwaitingStat | BoostPhase::Complete => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self.phase,
            BoostPhase::Drawing { .. } | BoostPhase::Applying { .. }
        )
    }

    pub fn is_complete(&self) -> bool {
        self.phase == BoostPhase::Complete
    }

    pub fn prompt(&self) -> BoostPrompt {
        let round = self.applied + 1;
        match self.phase {
            BoostPhase::AwaitingStat => BoostPrompt::ChooseStat { round },
            BoostPhase::AwaitingDraw { stat } => BoostPrompt::Draw { round, stat },
            BoostPhase::Drawing { .. } | BoostPhase::Applying { .. } => BoostPrompt::Waiting,
            BoostPhase::Complete => BoostPrompt::Locked,
        }
    }

    pub fn choose_stat(
        &mut self,
        stat: StatName,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<(), SessionError> {
        match self.phase {
            BoostPhase::Complete => Err(SessionError::BoostLocked),
            BoostPhase::Drawing { .. } | BoostPhase::Applying { .. } => {
                Err(SessionError::DrawPending)
            }
            BoostPhase::AwaitingStat | BoostPhase::AwaitingDraw { .. } => {
                self.phase = BoostPhase::AwaitingDraw { stat };
                emit(UiEvent::Boost(self.prompt()));
                Ok(())
            }
        }
    }

    /// Start the card fetch for the chosen stat.
    pub fn begin_draw(&mut self, mut emit: impl FnMut(UiEvent)) -> Result<StatName, SessionError> {
        match self.phase {
            BoostPhase::AwaitingDraw { stat } => {
                self.phase = BoostPhase::Drawing { stat };
                debug!(%stat, "drawing boost card");
                emit(UiEvent::Boost(self.prompt()));
                Ok(stat)
            }
            BoostPhase::AwaitingStat => Err(SessionError::NoStatChosen),
            BoostPhase::Drawing { .. } | BoostPhase::Applying { .. } => {
                Err(SessionError::DrawPending)
            }
            BoostPhase::Complete => Err(SessionError::BoostLocked),
        }
    }

    /// Feed the card fetch result; on success returns the boost to submit next.
    pub fn card_drawn(
        &mut self,
        outcome: Result<u32, AuthorityError>,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<BoostRequest, SessionError> {
        let BoostPhase::Drawing { stat } = self.phase else {
            return Err(SessionError::NoDrawPending);
        };
        match outcome {
            Ok(card) => {
                self.phase = BoostPhase::Applying { stat, card };
                emit(UiEvent::Notice(format!("You drew a +{} card", card)));
                Ok(BoostRequest {
                    card,
                    chosen_stat: stat,
                })
            }
            Err(e) => Err(self.fail(stat, e, &mut emit)),
        }
    }

    /// Feed the boost submission result; the returned snapshot replaces the character.
    pub fn complete_apply(
        &mut self,
        outcome: Result<Character, AuthorityError>,
        character: &mut CharacterViewModel,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<u8, SessionError> {
        let BoostPhase::Applying { stat, card } = self.phase else {
            return Err(SessionError::NoDrawPending);
        };
        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(e) => return Err(self.fail(stat, e, &mut emit)),
        };

        character.replace(snapshot.clone());
        self.applied += 1;
        self.phase = if self.applied >= BOOST_ROUNDS {
            BoostPhase::Complete
        } else {
            BoostPhase::AwaitingStat
        };
        info!(%stat, card, applied = self.applied, "stat boost applied");

        emit(UiEvent::CharacterChanged(snapshot));
        emit(UiEvent::Notice(format!("{} boosted by +{}", stat, card)));
        emit(UiEvent::Boost(self.prompt()));
        Ok(self.applied)
    }

    fn fail(
        &mut self,
        stat: StatName,
        e: AuthorityError,
        emit: &mut impl FnMut(UiEvent),
    ) -> SessionError {
        warn!(%stat, error = %e, "stat boost failed");
        self.phase = BoostPhase::AwaitingDraw { stat };
        emit(UiEvent::Error(e.to_string()));
        emit(UiEvent::Boost(self.prompt()));
        e.into()
    }
}
