#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use cardbound_engine::{
    AuthorityError, BoostRequest, Character, Class, CombatAuthority, NewCharacter, Race,
    RoundRequest, RoundResponse, StatName, Stats,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

/// Every request the scripted authority saw, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Create(NewCharacter),
    Randomize,
    Boost(BoostRequest),
    Round(RoundRequest),
    Save(String),
    Load(String),
}

/// Stand-in for the remote authority. Rounds are answered from a script; boost cards come
/// from a script first and then from a seeded RNG in 1..=4.
pub struct ScriptedAuthority {
    character: Mutex<Character>,
    rounds: Mutex<VecDeque<Result<RoundResponse, AuthorityError>>>,
    draws: Mutex<VecDeque<Result<u32, AuthorityError>>>,
    rng: Mutex<ChaCha8Rng>,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedAuthority {
    pub fn new(seed: u64) -> Self {
        Self {
            character: Mutex::new(sample_character()),
            rounds: Mutex::new(VecDeque::new()),
            draws: Mutex::new(VecDeque::new()),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn push_round(&self, outcome: Result<RoundResponse, AuthorityError>) {
        self.rounds.lock().unwrap().push_back(outcome);
    }

    pub fn push_round_json(&self, value: Value) {
        self.push_round(Ok(round(value)));
    }

    pub fn push_draw(&self, outcome: Result<u32, AuthorityError>) {
        self.draws.lock().unwrap().push_back(outcome);
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn round_requests(&self) -> Vec<RoundRequest> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Round(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn record(&self, seen: Seen) {
        self.seen.lock().unwrap().push(seen);
    }
}

#[async_trait]
impl CombatAuthority for ScriptedAuthority {
    async fn create_character(&self, req: &NewCharacter) -> Result<Character, AuthorityError> {
        self.record(Seen::Create(req.clone()));
        let mut c = self.character.lock().unwrap();
        c.name = req.name.clone();
        c.race = req.race;
        c.class = req.class;
        Ok(c.clone())
    }

    async fn randomize_card(&self) -> Result<u32, AuthorityError> {
        self.record(Seen::Randomize);
        if let Some(next) = self.draws.lock().unwrap().pop_front() {
            return next;
        }
        Ok(self.rng.lock().unwrap().gen_range(1..=4))
    }

    async fn apply_stat_boost(&self, req: &BoostRequest) -> Result<Character, AuthorityError> {
        self.record(Seen::Boost(*req));
        let mut c = self.character.lock().unwrap();
        let boost = req.card as i32;
        match req.chosen_stat {
            StatName::Strength => c.stats.strength += boost,
            StatName::Dexterity => c.stats.dexterity += boost,
            StatName::Intelligence => c.stats.intelligence += boost,
            StatName::Endurance => c.stats.endurance += boost,
            StatName::Perception => c.stats.perception += boost,
            StatName::Wisdom => c.stats.wisdom += boost,
            StatName::Agility => c.stats.agility += boost,
            StatName::Luck => c.stats.luck += boost,
        }
        Ok(c.clone())
    }

    async fn play_round(&self, req: &RoundRequest) -> Result<RoundResponse, AuthorityError> {
        self.record(Seen::Round(req.clone()));
        self.rounds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AuthorityError::Transport("no scripted round".into())))
    }

    async fn save_progress(&self, snapshot: &Character) -> Result<String, AuthorityError> {
        self.record(Seen::Save(snapshot.name.clone()));
        Ok("Progress saved successfully".into())
    }

    async fn load_progress(&self, name: &str) -> Result<Character, AuthorityError> {
        self.record(Seen::Load(name.to_string()));
        let c = self.character.lock().unwrap();
        if c.name == name {
            Ok(c.clone())
        } else {
            Err(AuthorityError::Status {
                status: 404,
                body: "Player not found".into(),
            })
        }
    }
}

pub fn sample_character() -> Character {
    Character {
        name: "Brom".into(),
        race: Race::Dwarf,
        class: Class::Warrior,
        level: 1,
        xp: 0,
        health: 30,
        max_health: 30,
        mana: 10,
        max_mana: 10,
        gold: 100,
        armor: "Wooden Barrel Plate".into(),
        weapon: "Training Wooden Sword".into(),
        stats: Stats {
            strength: 19,
            dexterity: 8,
            intelligence: 8,
            endurance: 17,
            perception: 8,
            wisdom: 10,
            agility: 6,
            luck: 12,
        },
    }
}

pub fn round(value: Value) -> RoundResponse {
    serde_json::from_value(value).expect("valid round response")
}

pub fn fight_started() -> RoundResponse {
    round(serde_json::json!({
        "result": "fight started",
        "playerHP": 30, "playerMaxHP": 30,
        "playerMana": 10, "playerMaxMana": 10,
        "enemyName": "Goblin", "enemyHP": 12, "enemyMaxHP": 12
    }))
}
