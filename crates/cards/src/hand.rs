// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Blackjack hand and totals.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Card, Value};

/// The best total a hand can reach without busting.
pub const BLACKJACK: u32 = 21;

/// An ordered sequence of cards.
///
/// Cards can only be appended or the last card replaced, totals are computed
/// from the cards on each call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

/// A hand total after soft aces adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Total {
    /// The hand points.
    pub points: u32,
    /// There is still an ace counted as 11.
    pub soft: bool,
}

impl Hand {
    /// Creates a hand from a list of cards.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Appends a card to the hand.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replaces the last card, returns the replaced card or `None` if the
    /// hand is empty and the card has been appended.
    pub fn replace_last(&mut self, card: Card) -> Option<Card> {
        match self.cards.last_mut() {
            Some(last) => Some(std::mem::replace(last, card)),
            None => {
                self.cards.push(card);
                None
            }
        }
    }

    /// The hand cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The hand card values in order.
    pub fn values(&self) -> Vec<Value> {
        self.cards.iter().map(|c| c.value()).collect()
    }

    /// The number of cards in the hand.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Checks if the hand has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Computes the hand total.
    pub fn total(&self) -> Total {
        total(self.cards.iter().map(|c| c.value()))
    }

    /// Checks if the hand total is over 21.
    pub fn is_bust(&self) -> bool {
        self.total().points > BLACKJACK
    }

    /// Checks if the hand is a two cards 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total().points == BLACKJACK
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, card) in self.cards.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }

            write!(f, "{card}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.soft {
            write!(f, "soft {}", self.points)
        } else {
            write!(f, "{}", self.points)
        }
    }
}

/// Computes the total for a sequence of card values.
///
/// Aces count 11 and are converted to 1, one at a time, while the total is
/// over 21.
pub fn total(values: impl IntoIterator<Item = Value>) -> Total {
    let mut points = 0;
    let mut aces = 0;

    for value in values {
        points += value.points();
        if value.is_ace() {
            aces += 1;
        }
    }

    while points > BLACKJACK && aces > 0 {
        points -= 10;
        aces -= 1;
    }

    Total {
        points,
        soft: aces > 0,
    }
}
