use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Orc,
    Gnome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    Warrior,
    Mage,
    Rogue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Strength,
    Dexterity,
    Intelligence,
    Endurance,
    Perception,
    Wisdom,
    Agility,
    Luck,
}

impl StatName {
    pub const ALL: [StatName; 8] = [
        StatName::Strength,
        StatName::Dexterity,
        StatName::Intelligence,
        StatName::Endurance,
        StatName::Perception,
        StatName::Wisdom,
        StatName::Agility,
        StatName::Luck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatName::Strength => "strength",
            StatName::Dexterity => "dexterity",
            StatName::Intelligence => "intelligence",
            StatName::Endurance => "endurance",
            StatName::Perception => "perception",
            StatName::Wisdom => "wisdom",
            StatName::Agility => "agility",
            StatName::Luck => "luck",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Error from parsing a race, class, or stat name typed by the player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_named<T: Copy + fmt::Display>(
    kind: &'static str,
    options: &[T],
    s: &str,
) -> Result<T, ParseNameError> {
    let wanted = s.trim();
    options
        .iter()
        .copied()
        .find(|o| o.to_string().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ParseNameError {
            kind,
            value: s.to_string(),
        })
}

impl FromStr for Race {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Race::*;
        parse_named("race", &[Human, Elf, Dwarf, Orc, Gnome], s)
    }
}

impl FromStr for Class {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Class::*;
        parse_named("class", &[Warrior, Mage, Rogue], s)
    }
}

impl FromStr for StatName {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("stat", &StatName::ALL, s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub endurance: i32,
    pub perception: i32,
    pub wisdom: i32,
    pub agility: i32,
    pub luck: i32,
}

impl Stats {
    pub fn get(&self, stat: StatName) -> i32 {
        match stat {
            StatName::Strength => self.strength,
            StatName::Dexterity => self.dexterity,
            StatName::Intelligence => self.intelligence,
            StatName::Endurance => self.endurance,
            StatName::Perception => self.perception,
            StatName::Wisdom => self.wisdom,
            StatName::Agility => self.agility,
            StatName::Luck => self.luck,
        }
    }
}

/// Authoritative character snapshot, exactly as the server sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub race: Race,
    pub class: Class,
    pub level: u32,
    pub xp: u32,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub gold: u32,
    pub armor: String,
    pub weapon: String,
    pub stats: Stats,
}

impl Character {
    pub fn vitals(&self) -> Vitals {
        Vitals {
            health: self.health,
            max_health: self.max_health,
            mana: self.mana,
            max_mana: self.max_mana,
        }
    }
}

/// Current and maximum health and mana, the part of a character combat rounds touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vitals {
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
}

/// Client-side mirror of the authoritative character.
///
/// Only whole snapshots go in through [`CharacterViewModel::replace`]. The combat controller
/// is the single exception: it overwrites vitals after computing its deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterViewModel {
    snapshot: Option<Character>,
}

impl CharacterViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Character> {
        self.snapshot.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn replace(&mut self, snapshot: Character) {
        self.snapshot = Some(snapshot);
    }

    pub(crate) fn overwrite_vitals(&mut self, vitals: Vitals) {
        if let Some(c) = self.snapshot.as_mut() {
            c.health = vitals.health;
            c.max_health = vitals.max_health;
            c.mana = vitals.mana;
            c.max_mana = vitals.max_mana;
        }
    }
}

/// Character creation input as collected from the player, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterForm {
    pub name: String,
    pub race: Option<Race>,
    pub class: Option<Class>,
}

/// Validated creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCharacter {
    pub name: String,
    pub class: Class,
    pub race: Race,
}

impl CharacterForm {
    /// Returns the first missing field's name on failure.
    pub fn validate(&self) -> Result<NewCharacter, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name");
        }
        let race = self.race.ok_or("race")?;
        let class = self.class.ok_or("class")?;
        Ok(NewCharacter {
            name: name.to_string(),
            class,
            race,
        })
    }
}
