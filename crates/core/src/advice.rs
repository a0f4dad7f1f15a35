// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Type definitions for the advice API payloads.
use serde::{Deserialize, Serialize};
use std::fmt;

use hitstand_cards::Value;

/// The table rules sent with every advice request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRules {
    /// Double after split is allowed.
    pub das_allowed: bool,
    /// Late surrender is allowed.
    pub surrender_allowed: bool,
    /// Number of decks in the shoe.
    pub decks: u8,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            das_allowed: true,
            surrender_allowed: true,
            decks: 6,
        }
    }
}

/// The advice request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    /// The player card values in order.
    pub player: Vec<Value>,
    /// The dealer card values in order.
    pub dealer: Vec<Value>,
    /// The table rules.
    pub game_rules: GameRules,
}

/// The advice response body.
#[derive(Debug, Deserialize)]
pub(crate) struct AdviceResponse {
    pub action: Option<String>,
}

/// The token response body.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}

/// A recommended player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Take another card.
    Hit,
    /// Keep the current hand.
    Stand,
    /// Double the bet and take one card.
    Double,
    /// Split a pair.
    Split,
    /// Give up half the bet.
    Surrender,
    /// An action string this client does not know.
    Other(String),
}

impl Action {
    /// Parses an advice string, unknown strings are kept as they are.
    pub fn parse(advice: &str) -> Self {
        match advice.trim().to_ascii_lowercase().as_str() {
            "hit" => Action::Hit,
            "stand" => Action::Stand,
            "double" => Action::Double,
            "split" => Action::Split,
            "surrender" => Action::Surrender,
            _ => Action::Other(advice.to_string()),
        }
    }

    /// The action label.
    pub fn label(&self) -> &str {
        match self {
            Action::Hit => "HIT",
            Action::Stand => "STAND",
            Action::Double => "DOUBLE",
            Action::Split => "SPLIT",
            Action::Surrender => "SURRENDER",
            Action::Other(s) => s,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
