use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a card does when cast. A card either hurts or heals, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEffect {
    Damage(u32),
    Heal(u32),
}

impl fmt::Display for CardEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardEffect::Damage(n) => write!(f, "Damage: {}", n),
            CardEffect::Heal(n) => write!(f, "Heal: {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord", into = "CardRecord")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub effect: CardEffect,
    pub mana_cost: u32,
}

/// On-disk shape of a card: `damage` and `heal` are sibling optional fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    id: CardId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    damage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    heal: Option<u32>,
    mana_cost: u32,
}

impl TryFrom<CardRecord> for Card {
    type Error = CatalogError;

    fn try_from(rec: CardRecord) -> Result<Self, Self::Error> {
        let effect = match (rec.damage, rec.heal) {
            (Some(n), None) => CardEffect::Damage(n),
            (None, Some(n)) => CardEffect::Heal(n),
            _ => return Err(CatalogError::AmbiguousEffect { id: rec.id }),
        };
        Ok(Card {
            id: rec.id,
            name: rec.name,
            effect,
            mana_cost: rec.mana_cost,
        })
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        let (damage, heal) = match card.effect {
            CardEffect::Damage(n) => (Some(n), None),
            CardEffect::Heal(n) => (None, Some(n)),
        };
        CardRecord {
            id: card.id,
            name: card.name,
            damage,
            heal,
            mana_cost: card.mana_cost,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("card {id} must have exactly one of `damage` or `heal`")]
    AmbiguousEffect { id: CardId },
    #[error("duplicate card id {0}")]
    DuplicateId(CardId),
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

const STANDARD_CARDS: [(u32, &str, CardEffect, u32); 4] = [
    (1, "Fireball", CardEffect::Damage(10), 5),
    (2, "Ice Shard", CardEffect::Damage(8), 4),
    (3, "Healing Light", CardEffect::Heal(15), 6),
    (4, "Shadow Strike", CardEffect::Damage(12), 7),
];

/// Fixed lookup of card ids to their static attributes. Iteration follows catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    cards: IndexMap<CardId, Card>,
}

impl Catalog {
    pub fn standard() -> Self {
        let cards = STANDARD_CARDS
            .iter()
            .map(|&(id, name, effect, mana_cost)| {
                let card = Card {
                    id: CardId(id),
                    name: name.to_string(),
                    effect,
                    mana_cost,
                };
                (card.id, card)
            })
            .collect();
        Self { cards }
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self, CatalogError> {
        let mut map = IndexMap::new();
        for card in cards {
            if map.contains_key(&card.id) {
                return Err(CatalogError::DuplicateId(card.id));
            }
            map.insert(card.id, card);
        }
        Ok(Self { cards: map })
    }

    /// Parse a JSON array of `{id, name, damage|heal, manaCost}` records.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(text)?;
        Self::from_cards(cards)
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
