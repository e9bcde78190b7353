pub mod authority;
pub mod catalog;
pub mod character;
pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod http;
pub mod presentation;
pub mod session;
pub mod stat_boost;

pub use authority::{
    AuthorityError, BoostRequest, CombatAuthority, RoundAction, RoundRequest, RoundResponse,
    FIGHT_STARTED,
};
pub use catalog::{Card, CardEffect, CardId, Catalog, CatalogError};
pub use character::{
    Character, CharacterForm, CharacterViewModel, Class, NewCharacter, Race, StatName, Stats,
    Vitals,
};
pub use config::ClientConfig;
pub use deck::{Deck, Toggle, UnknownCardError};
pub use error::SessionError;
pub use game::Game;
pub use http::HttpAuthority;
pub use presentation::{Affordances, BoostPrompt, DeltaAnnotation, Meter, Presenter, UiEvent};
pub use session::{
    CombatSession, CombatStatus, EnemyViewModel, RoundOutcome, RoundTicket, UNNAMED_ENEMY,
};
pub use stat_boost::{BoostPhase, StatBoostFlow, BOOST_ROUNDS};
