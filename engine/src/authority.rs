//! The remote combat authority: request/response shapes and the port the client talks through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CardId;
use crate::character::{Character, NewCharacter, StatName};

/// Result marker the authority puts on the response to a `start` round.
pub const FIGHT_STARTED: &str = "fight started";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundAction {
    Start,
    Attack,
    CastSpell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRequest {
    pub action: RoundAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
}

/// Authoritative outcome of one round. Which fields are required depends on whether this
/// opens a fight, so presence is checked during reconciliation, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RoundResponse {
    pub result: String,
    #[serde(rename = "playerHP")]
    pub player_hp: Option<i32>,
    #[serde(rename = "playerMaxHP")]
    pub player_max_hp: Option<i32>,
    #[serde(rename = "playerMana")]
    pub player_mana: Option<i32>,
    #[serde(rename = "playerMaxMana")]
    pub player_max_mana: Option<i32>,
    #[serde(rename = "enemyName")]
    pub enemy_name: Option<String>,
    #[serde(rename = "enemyHP")]
    pub enemy_hp: Option<i32>,
    #[serde(rename = "enemyMaxHP")]
    pub enemy_max_hp: Option<i32>,
    #[serde(rename = "combatOver", default)]
    pub combat_over: bool,
    #[serde(default)]
    pub player: Option<Character>,
}

impl RoundResponse {
    pub fn is_fight_start(&self) -> bool {
        self.result == FIGHT_STARTED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostRequest {
    pub card: u32,
    pub chosen_stat: StatName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CombatAuthority {
    async fn create_character(&self, req: &NewCharacter) -> Result<Character, AuthorityError>;

    /// Draw a stat-boost card; the value is the boost magnitude.
    async fn randomize_card(&self) -> Result<u32, AuthorityError>;

    async fn apply_stat_boost(&self, req: &BoostRequest) -> Result<Character, AuthorityError>;

    async fn play_round(&self, req: &RoundRequest) -> Result<RoundResponse, AuthorityError>;

    /// Returns the server's acknowledgement text.
    async fn save_progress(&self, snapshot: &Character) -> Result<String, AuthorityError>;

    async fn load_progress(&self, name: &str) -> Result<Character, AuthorityError>;
}
