// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Advice responses cache.
use ahash::AHashMap;

use hitstand_cards::{Hand, Value};

/// A cache key built from the card values of both hands.
///
/// Suits are ignored and the order of the cards matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandKey {
    player: Vec<Value>,
    dealer: Vec<Value>,
}

impl HandKey {
    /// Creates a key from the player and dealer hands.
    pub fn new(player: &Hand, dealer: &Hand) -> Self {
        Self {
            player: player.values(),
            dealer: dealer.values(),
        }
    }

    /// The player values.
    pub fn player(&self) -> &[Value] {
        &self.player
    }

    /// The dealer values.
    pub fn dealer(&self) -> &[Value] {
        &self.dealer
    }
}

/// Last advice received for each hands composition.
///
/// There is no eviction, the cache is cleared when the hands are cleared.
#[derive(Debug, Default)]
pub struct AdviceCache {
    entries: AHashMap<HandKey, String>,
}

impl AdviceCache {
    /// Gets the advice for a key.
    pub fn get(&self, key: &HandKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores the advice for a key replacing any previous one.
    pub fn insert(&mut self, key: HandKey, advice: String) {
        self.entries.insert(key, advice);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
