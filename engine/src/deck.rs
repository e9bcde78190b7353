use std::collections::BTreeSet;

use thiserror::Error;

use crate::catalog::{Card, CardId, Catalog};

pub const ADD_LABEL: &str = "Add to Deck";
pub const REMOVE_LABEL: &str = "Remove from Deck";

/// Outcome of flipping a card's deck membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

impl Toggle {
    pub fn in_deck(self) -> bool {
        matches!(self, Toggle::Added)
    }

    pub fn verb(self) -> &'static str {
        match self {
            Toggle::Added => "added to",
            Toggle::Removed => "removed from",
        }
    }
}

/// A deck referenced a card the catalog does not know. Catalog and deck are kept in sync by
/// construction, so this signals a bug rather than bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("card {0} is in the deck but missing from the catalog")]
pub struct UnknownCardError(pub CardId);

/// Cards the player has committed to combat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: BTreeSet<CardId>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: CardId) -> Toggle {
        if self.cards.remove(&id) {
            Toggle::Removed
        } else {
            self.cards.insert(id);
            Toggle::Added
        }
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    /// Label for the deck-builder button of `id`; always derived from membership.
    pub fn button_label(&self, id: CardId) -> &'static str {
        if self.contains(id) {
            REMOVE_LABEL
        } else {
            ADD_LABEL
        }
    }

    /// Resolve every deck id against the catalog, in catalog order.
    pub fn build_hand(&self, catalog: &Catalog) -> Result<Vec<Card>, UnknownCardError> {
        if let Some(missing) = self.ids().find(|id| !catalog.contains(*id)) {
            return Err(UnknownCardError(missing));
        }
        Ok(catalog
            .iter()
            .filter(|card| self.contains(card.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_membership() {
        let mut deck = Deck::new();
        assert_eq!(deck.button_label(CardId(2)), ADD_LABEL);
        assert_eq!(deck.toggle(CardId(2)), Toggle::Added);
        assert_eq!(deck.button_label(CardId(2)), REMOVE_LABEL);
        assert_eq!(deck.toggle(CardId(2)), Toggle::Removed);
        assert_eq!(deck.button_label(CardId(2)), ADD_LABEL);
    }

    #[test]
    fn unknown_card_is_reported() {
        let mut deck = Deck::new();
        deck.toggle(CardId(1));
        deck.toggle(CardId(99));
        let err = deck.build_hand(&Catalog::standard()).unwrap_err();
        assert_eq!(err, UnknownCardError(CardId(99)));
    }
}
