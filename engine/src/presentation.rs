use crate::catalog::{Card, CardId};
use crate::character::{Character, StatName};

/// Which meter a bar event or delta annotation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meter {
    PlayerHealth,
    PlayerMana,
    EnemyHealth,
}

impl Meter {
    pub fn category(self) -> Category {
        match self {
            Meter::PlayerHealth | Meter::EnemyHealth => Category::Health,
            Meter::PlayerMana => Category::Mana,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Health,
    Mana,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Restorative,
    Damage,
}

/// Floating "+N"/"-N" shown next to a meter after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaAnnotation {
    pub meter: Meter,
    pub amount: i32,
}

impl DeltaAnnotation {
    pub fn tone(&self) -> Tone {
        if self.amount > 0 {
            Tone::Restorative
        } else {
            Tone::Damage
        }
    }

    pub fn category(&self) -> Category {
        self.meter.category()
    }

    pub fn text(&self) -> String {
        format!("{:+}", self.amount)
    }

    /// Health and mana each get their own colour pair.
    pub fn color(&self) -> &'static str {
        match (self.category(), self.tone()) {
            (Category::Health, Tone::Restorative) => "green",
            (Category::Health, Tone::Damage) => "red",
            (Category::Mana, Tone::Restorative) => "blue",
            (Category::Mana, Tone::Damage) => "purple",
        }
    }
}

/// Which combat controls are clickable right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub start: bool,
    pub attack: bool,
    pub select_card: bool,
    pub cast_spell: bool,
}

impl Affordances {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any_combat_action(&self) -> bool {
        self.attack || self.select_card || self.cast_spell
    }
}

/// What the stat-boost panel should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostPrompt {
    ChooseStat { round: u8 },
    Draw { round: u8, stat: StatName },
    Waiting,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    CharacterChanged(Character),
    LogAppended(String),
    Bar { meter: Meter, value: i32, max: i32 },
    Delta(DeltaAnnotation),
    Affordances(Affordances),
    FightStarted { enemy: String },
    FightConcluded,
    HandShown(Vec<Card>),
    HandHidden,
    CardSelected(CardId),
    DeckToggled { card: CardId, name: String, in_deck: bool, label: &'static str },
    Boost(BoostPrompt),
    Notice(String),
    Error(String),
}

/// Renders session events. Holds no game state of its own.
pub trait Presenter {
    fn present(&mut self, event: UiEvent);
}

impl<F: FnMut(UiEvent)> Presenter for F {
    fn present(&mut self, event: UiEvent) {
        self(event)
    }
}

/// Presenter that keeps every event, for tests and replays.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<UiEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn log_lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::LogAppended(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn deltas(&self) -> Vec<DeltaAnnotation> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Delta(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn last_affordances(&self) -> Option<Affordances> {
        self.events.iter().rev().find_map(|e| match e {
            UiEvent::Affordances(a) => Some(*a),
            _ => None,
        })
    }
}

impl Presenter for Recorder {
    fn present(&mut self, event: UiEvent) {
        self.events.push(event);
    }
}

/// Plain-text character overview.
pub fn character_sheet(c: &Character) -> String {
    let mut out = format!(
        "{}\n{} {}  level {}  xp {}\nHP {} / {}  MP {} / {}  gold {}\narmor: {}\nweapon: {}\n",
        c.name,
        c.race,
        c.class,
        c.level,
        c.xp,
        c.health,
        c.max_health,
        c.mana,
        c.max_mana,
        c.gold,
        c.armor,
        c.weapon
    );
    for stat in StatName::ALL {
        out.push_str(&format!("{:<13}{}\n", stat.as_str(), c.stats.get(stat)));
    }
    out
}

pub fn card_line(card: &Card) -> String {
    format!(
        "[{}] {} ({}, Mana Cost: {})",
        card.id, card.name, card.effect, card.mana_cost
    )
}
