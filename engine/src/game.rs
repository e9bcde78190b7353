//! The session object a front end owns: all client-side state plus the authority it talks to.
//!
//! Every remote operation runs start to finish inside one `&mut self` call, so a second
//! action cannot begin until the previous response has been reconciled.

use tracing::{error, info};

use crate::authority::{CombatAuthority, RoundRequest};
use crate::catalog::{CardId, Catalog};
use crate::character::{CharacterForm, CharacterViewModel, StatName};
use crate::deck::{Deck, Toggle};
use crate::error::SessionError;
use crate::presentation::{Presenter, UiEvent};
use crate::session::{CombatSession, RoundOutcome, RoundTicket};
use crate::stat_boost::StatBoostFlow;

pub struct Game<A, P> {
    authority: A,
    presenter: P,
    catalog: Catalog,
    deck: Deck,
    character: CharacterViewModel,
    combat: CombatSession,
    boost: StatBoostFlow,
}

impl<A: CombatAuthority, P: Presenter> Game<A, P> {
    pub fn new(authority: A, presenter: P) -> Self {
        Self::with_catalog(authority, presenter, Catalog::standard())
    }

    pub fn with_catalog(authority: A, presenter: P, catalog: Catalog) -> Self {
        Self {
            authority,
            presenter,
            catalog,
            deck: Deck::new(),
            character: CharacterViewModel::new(),
            combat: CombatSession::new(),
            boost: StatBoostFlow::locked(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn character(&self) -> &CharacterViewModel {
        &self.character
    }

    pub fn combat(&self) -> &CombatSession {
        &self.combat
    }

    pub fn boost(&self) -> &StatBoostFlow {
        &self.boost
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /* ---------------- character lifecycle ---------------- */

    pub async fn create_character(&mut self, form: &CharacterForm) -> Result<(), SessionError> {
        let req = form.validate().map_err(SessionError::MissingField)?;
        let snapshot = match self.authority.create_character(&req).await {
            Ok(c) => c,
            Err(e) => return Err(self.remote_failure(e.into())),
        };
        info!(name = %snapshot.name, race = %snapshot.race, class = %snapshot.class, "character created");
        self.character.replace(snapshot);
        self.boost = StatBoostFlow::new();
        self.reset_combat();
        self.announce_character();
        self.presenter.present(UiEvent::Boost(self.boost.prompt()));
        Ok(())
    }

    pub async fn load_progress(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::MissingField("name"));
        }
        let snapshot = match self.authority.load_progress(name).await {
            Ok(c) => c,
            Err(e) => return Err(self.remote_failure(e.into())),
        };
        info!(name, "progress loaded");
        self.character.replace(snapshot);
        self.boost = StatBoostFlow::locked();
        self.reset_combat();
        self.announce_character();
        self.presenter
            .present(UiEvent::Notice("Progress loaded successfully!".into()));
        Ok(())
    }

    pub async fn save_progress(&mut self) -> Result<(), SessionError> {
        let snapshot = self.character.get().cloned().ok_or(SessionError::NoCharacter)?;
        match self.authority.save_progress(&snapshot).await {
            Ok(ack) => {
                info!(name = %snapshot.name, "progress saved");
                let notice = if ack.is_empty() {
                    "Progress saved successfully!".to_string()
                } else {
                    ack
                };
                self.presenter.present(UiEvent::Notice(notice));
                Ok(())
            }
            Err(e) => Err(self.remote_failure(e.into())),
        }
    }

    fn reset_combat(&mut self) {
        self.combat = CombatSession::new();
        self.presenter
            .present(UiEvent::Affordances(self.combat.affordances()));
    }

    fn announce_character(&mut self) {
        if let Some(c) = self.character.get() {
            self.presenter.present(UiEvent::CharacterChanged(c.clone()));
        }
    }

    fn remote_failure(&mut self, e: SessionError) -> SessionError {
        self.presenter.present(UiEvent::Error(e.to_string()));
        e
    }

    /* ---------------- stat boosts ---------------- */

    pub fn choose_stat(&mut self, stat: StatName) -> Result<(), SessionError> {
        if !self.character.is_loaded() {
            return Err(SessionError::NoCharacter);
        }
        self.boost
            .choose_stat(stat, |e| self.presenter.present(e))
    }

    /// Draw a boost card and apply it to the chosen stat. Returns how many boosts are applied.
    pub async fn draw_and_apply(&mut self) -> Result<u8, SessionError> {
        self.boost.begin_draw(|e| self.presenter.present(e))?;
        let drawn = self.authority.randomize_card().await;
        let req = self
            .boost
            .card_drawn(drawn, |e| self.presenter.present(e))?;
        let applied = self.authority.apply_stat_boost(&req).await;
        self.boost
            .complete_apply(applied, &mut self.character, |e| self.presenter.present(e))
    }

    /* ---------------- deck ---------------- */

    pub fn toggle_card(&mut self, id: CardId) -> Result<Toggle, SessionError> {
        let name = self
            .catalog
            .get(id)
            .map(|c| c.name.clone())
            .ok_or(SessionError::UnknownCard(id))?;
        let toggle = self.deck.toggle(id);
        self.presenter.present(UiEvent::DeckToggled {
            card: id,
            name: name.clone(),
            in_deck: toggle.in_deck(),
            label: self.deck.button_label(id),
        });
        self.presenter
            .present(UiEvent::Notice(format!("{} {} deck", name, toggle.verb())));
        // A shown hand always mirrors the deck.
        if self.combat.hand().is_some() {
            self.show_hand()?;
        }
        Ok(toggle)
    }

    /* ---------------- combat ---------------- */

    pub fn show_hand(&mut self) -> Result<(), SessionError> {
        let hand = self.deck.build_hand(&self.catalog).map_err(|e| {
            error!(error = %e, "deck and catalog out of sync");
            SessionError::from(e)
        })?;
        self.combat.show_hand(hand, |e| self.presenter.present(e))
    }

    pub fn select_card(&mut self, id: CardId) -> Result<(), SessionError> {
        self.combat.select_card(id, |e| self.presenter.present(e))
    }

    pub async fn start_combat(&mut self) -> Result<RoundOutcome, SessionError> {
        if !self.character.is_loaded() {
            return Err(SessionError::NoCharacter);
        }
        let (ticket, req) = self.combat.begin_start(|e| self.presenter.present(e))?;
        self.play(ticket, req).await
    }

    pub async fn attack(&mut self) -> Result<RoundOutcome, SessionError> {
        let (ticket, req) = self.combat.begin_attack(|e| self.presenter.present(e))?;
        self.play(ticket, req).await
    }

    pub async fn cast_spell(&mut self) -> Result<RoundOutcome, SessionError> {
        let (ticket, req) = self
            .combat
            .begin_cast_spell(|e| self.presenter.present(e))?;
        self.play(ticket, req).await
    }

    async fn play(
        &mut self,
        ticket: RoundTicket,
        req: RoundRequest,
    ) -> Result<RoundOutcome, SessionError> {
        let outcome = self.authority.play_round(&req).await;
        self.combat.complete_round(ticket, outcome, &mut self.character, |e| {
            self.presenter.present(e)
        })
    }
}
