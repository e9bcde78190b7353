//! Combat session controller.
//!
//! Sans-IO: `begin_*` validates the player's intent, marks the round in flight and hands back
//! the request to send; `complete_round` reconciles whatever came back. Exactly one round may
//! be in flight, and a completion is only accepted for the ticket that round was issued.

use tracing::{debug, info, warn};

use crate::authority::{AuthorityError, RoundAction, RoundRequest, RoundResponse};
use crate::catalog::{Card, CardId};
use crate::character::{CharacterViewModel, Vitals};
use crate::error::SessionError;
use crate::presentation::{Affordances, DeltaAnnotation, Meter, UiEvent};

/// Enemy name used when a start response does not carry one.
pub const UNNAMED_ENEMY: &str = "Enemy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombatStatus {
    #[default]
    Idle,
    Active,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyViewModel {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    FightStarted,
    Continued,
    CombatOver,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: RoundTicket,
    action: RoundAction,
}

#[derive(Debug, Default)]
pub struct CombatSession {
    status: CombatStatus,
    in_flight: Option<InFlight>,
    issued: u64,
    player: Option<Vitals>,
    enemy: Option<EnemyViewModel>,
    hand: Option<Vec<Card>>,
    selected: Option<CardId>,
    log: Vec<String>,
}

impl CombatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CombatStatus {
        self.status
    }

    pub fn is_round_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn enemy(&self) -> Option<&EnemyViewModel> {
        self.enemy.as_ref()
    }

    pub fn player_vitals(&self) -> Option<Vitals> {
        self.player
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn hand(&self) -> Option<&[Card]> {
        self.hand.as_deref()
    }

    pub fn selected_card_id(&self) -> Option<CardId> {
        self.selected
    }

    pub fn affordances(&self) -> Affordances {
        if self.in_flight.is_some() {
            return Affordances::none();
        }
        match self.status {
            CombatStatus::Idle | CombatStatus::Ended => Affordances {
                start: true,
                ..Affordances::none()
            },
            CombatStatus::Active => Affordances {
                start: false,
                attack: true,
                select_card: true,
                cast_spell: true,
            },
        }
    }

    /* ---------------- player intent ---------------- */

    pub fn begin_start(
        &mut self,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<(RoundTicket, RoundRequest), SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::RoundInFlight);
        }
        if self.status == CombatStatus::Active {
            return Err(SessionError::CombatAlreadyActive);
        }
        // An ended fight stays ended until the next start response opens a new one.
        Ok(self.submit(RoundAction::Start, None, &mut emit))
    }

    pub fn begin_attack(
        &mut self,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<(RoundTicket, RoundRequest), SessionError> {
        self.ensure_can_act()?;
        Ok(self.submit(RoundAction::Attack, None, &mut emit))
    }

    /// Cast the currently selected hand card.
    pub fn begin_cast_spell(
        &mut self,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<(RoundTicket, RoundRequest), SessionError> {
        self.ensure_can_act()?;
        let card = self.selected.ok_or(SessionError::NoCardSelected)?;
        Ok(self.submit(RoundAction::CastSpell, Some(card), &mut emit))
    }

    pub fn show_hand(
        &mut self,
        hand: Vec<Card>,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<(), SessionError> {
        self.ensure_can_act()?;
        if let Some(sel) = self.selected {
            if !hand.iter().any(|c| c.id == sel) {
                self.selected = None;
            }
        }
        emit(UiEvent::HandShown(hand.clone()));
        self.hand = Some(hand);
        Ok(())
    }

    /// Mark `id` as the selected hand card, replacing any previous selection.
    pub fn select_card(
        &mut self,
        id: CardId,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<(), SessionError> {
        self.ensure_can_act()?;
        let in_hand = self
            .hand
            .as_ref()
            .is_some_and(|hand| hand.iter().any(|c| c.id == id));
        if !in_hand {
            return Err(SessionError::CardNotInHand(id));
        }
        self.selected = Some(id);
        emit(UiEvent::CardSelected(id));
        Ok(())
    }

    fn ensure_can_act(&self) -> Result<(), SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::RoundInFlight);
        }
        match self.status {
            CombatStatus::Active => Ok(()),
            CombatStatus::Idle => Err(SessionError::NoActiveCombat),
            CombatStatus::Ended => Err(SessionError::CombatEnded),
        }
    }

    fn submit(
        &mut self,
        action: RoundAction,
        card_id: Option<CardId>,
        emit: &mut impl FnMut(UiEvent),
    ) -> (RoundTicket, RoundRequest) {
        self.issued += 1;
        let ticket = RoundTicket(self.issued);
        self.in_flight = Some(InFlight { ticket, action });
        debug!(?action, ?card_id, ticket = ticket.0, "round submitted");
        emit(UiEvent::Affordances(self.affordances()));
        (ticket, RoundRequest { action, card_id })
    }

    /* ---------------- reconciliation ---------------- */

    /// Reconcile the outcome of the round issued under `ticket`.
    ///
    /// The in-flight flag is cleared on success and failure alike. A ticket that does not
    /// match the round in flight is dropped with [`SessionError::StaleResponse`] and changes
    /// nothing.
    pub fn complete_round(
        &mut self,
        ticket: RoundTicket,
        outcome: Result<RoundResponse, AuthorityError>,
        character: &mut CharacterViewModel,
        mut emit: impl FnMut(UiEvent),
    ) -> Result<RoundOutcome, SessionError> {
        let flight = match self.in_flight {
            Some(f) if f.ticket == ticket => f,
            _ => {
                warn!(ticket = ticket.0, "stale round response discarded");
                return Err(SessionError::StaleResponse);
            }
        };
        self.in_flight = None;

        let result = outcome.and_then(|resp| self.reconcile(flight.action, resp, character, &mut emit));
        match result {
            Ok(done) => {
                emit(UiEvent::Affordances(self.affordances()));
                Ok(done)
            }
            Err(e) => {
                warn!(action = ?flight.action, error = %e, "round failed");
                emit(UiEvent::Error(e.to_string()));
                emit(UiEvent::Affordances(self.affordances()));
                Err(e.into())
            }
        }
    }

    fn reconcile(
        &mut self,
        action: RoundAction,
        resp: RoundResponse,
        character: &mut CharacterViewModel,
        emit: &mut impl FnMut(UiEvent),
    ) -> Result<RoundOutcome, AuthorityError> {
        if resp.is_fight_start() {
            self.open_fight(resp, character, emit)?;
            return Ok(RoundOutcome::FightStarted);
        }
        if action == RoundAction::Start {
            return Err(AuthorityError::Malformed(
                "start response is missing the fight-started marker".into(),
            ));
        }
        self.apply_round(resp, character, emit)
    }

    fn open_fight(
        &mut self,
        resp: RoundResponse,
        character: &mut CharacterViewModel,
        emit: &mut impl FnMut(UiEvent),
    ) -> Result<(), AuthorityError> {
        let cached = character.get().map(|c| c.vitals());
        let player = resolve_player(&resp, cached)?;
        let enemy_health = require(resp.enemy_hp, "enemyHP")?;
        let enemy = EnemyViewModel {
            name: resp
                .enemy_name
                .clone()
                .unwrap_or_else(|| UNNAMED_ENEMY.to_string()),
            health: enemy_health,
            max_health: resp.enemy_max_hp.unwrap_or(enemy_health),
        };

        info!(enemy = %enemy.name, hp = enemy.health, "fight started");
        self.status = CombatStatus::Active;
        self.selected = None;
        if self.hand.take().is_some() {
            emit(UiEvent::HandHidden);
        }
        self.player = Some(player);
        if let Some(snapshot) = resp.player {
            character.replace(snapshot);
        }
        character.overwrite_vitals(player);

        emit(UiEvent::FightStarted {
            enemy: enemy.name.clone(),
        });
        emit_bars(player, &enemy, emit);
        if let Some(c) = character.get() {
            emit(UiEvent::CharacterChanged(c.clone()));
        }
        self.enemy = Some(enemy);
        Ok(())
    }

    /// Delta-then-overwrite: every delta is taken against the mirrors as they were before
    /// this response, then the mirrors are replaced wholesale.
    fn apply_round(
        &mut self,
        resp: RoundResponse,
        character: &mut CharacterViewModel,
        emit: &mut impl FnMut(UiEvent),
    ) -> Result<RoundOutcome, AuthorityError> {
        let before_player = self.player.or_else(|| character.get().map(|c| c.vitals()));
        let player = resolve_player(&resp, before_player)?;
        let enemy_health = require(resp.enemy_hp, "enemyHP")?;
        let enemy = EnemyViewModel {
            name: resp
                .enemy_name
                .clone()
                .or_else(|| self.enemy.as_ref().map(|e| e.name.clone()))
                .ok_or_else(|| missing("enemyName"))?,
            health: enemy_health,
            max_health: resp
                .enemy_max_hp
                .or_else(|| self.enemy.as_ref().map(|e| e.max_health))
                .unwrap_or(enemy_health),
        };

        let before = before_player.unwrap_or(player);
        let before_enemy = self.enemy.as_ref().map_or(enemy.health, |e| e.health);
        let deltas = [
            (Meter::PlayerHealth, player.health - before.health),
            (Meter::PlayerMana, player.mana - before.mana),
            (Meter::EnemyHealth, enemy.health - before_enemy),
        ];

        self.log.push(resp.result.clone());
        emit(UiEvent::LogAppended(resp.result.clone()));
        for (meter, amount) in deltas {
            if amount != 0 {
                emit(UiEvent::Delta(DeltaAnnotation { meter, amount }));
            }
        }

        self.player = Some(player);
        if let Some(snapshot) = resp.player {
            character.replace(snapshot);
        }
        character.overwrite_vitals(player);
        emit_bars(player, &enemy, emit);
        if let Some(c) = character.get() {
            emit(UiEvent::CharacterChanged(c.clone()));
        }

        if !resp.combat_over {
            debug!(enemy_hp = enemy.health, player_hp = player.health, "round reconciled");
            self.enemy = Some(enemy);
            return Ok(RoundOutcome::Continued);
        }

        info!(enemy_hp = enemy.health, player_hp = player.health, "combat over");
        self.status = CombatStatus::Ended;
        self.enemy = None;
        self.hand = None;
        self.selected = None;
        emit(UiEvent::HandHidden);
        emit(UiEvent::FightConcluded);
        Ok(RoundOutcome::CombatOver)
    }
}

fn missing(field: &str) -> AuthorityError {
    AuthorityError::Malformed(format!("round response is missing `{}`", field))
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, AuthorityError> {
    value.ok_or_else(|| missing(field))
}

/// Player vitals from the response; gaps are filled from the embedded snapshot, then `cached`.
fn resolve_player(resp: &RoundResponse, cached: Option<Vitals>) -> Result<Vitals, AuthorityError> {
    let snapshot = resp.player.as_ref().map(|c| c.vitals());
    let fill = |explicit: Option<i32>, pick: fn(Vitals) -> i32, field: &str| {
        explicit
            .or(snapshot.map(pick))
            .or(cached.map(pick))
            .ok_or_else(|| missing(field))
    };
    Ok(Vitals {
        health: require(resp.player_hp, "playerHP")?,
        max_health: fill(resp.player_max_hp, |v| v.max_health, "playerMaxHP")?,
        mana: fill(resp.player_mana, |v| v.mana, "playerMana")?,
        max_mana: fill(resp.player_max_mana, |v| v.max_mana, "playerMaxMana")?,
    })
}

fn emit_bars(player: Vitals, enemy: &EnemyViewModel, emit: &mut impl FnMut(UiEvent)) {
    emit(UiEvent::Bar {
        meter: Meter::PlayerHealth,
        value: player.health,
        max: player.max_health,
    });
    emit(UiEvent::Bar {
        meter: Meter::PlayerMana,
        value: player.mana,
        max: player.max_mana,
    });
    emit(UiEvent::Bar {
        meter: Meter::EnemyHealth,
        value: enemy.health,
        max: enemy.max_health,
    });
}
