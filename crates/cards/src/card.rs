// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Blackjack cards definitions.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A blackjack card.
///
/// Serializes as `{"value": "10", "suit": "♥"}`, the format used for the
/// persisted hands.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    value: Value,
    suit: Suit,
}

impl Card {
    /// Create a card given a value and suit.
    pub const fn new(value: Value, suit: Suit) -> Card {
        Card { value, suit }
    }

    /// Returns the card value.
    pub fn value(&self) -> Value {
        self.value
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.value, self.suit)
    }
}

/// Parses cards written as value followed by suit, for example `AH`, `10s`,
/// `Td` or `K♣`.
impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_char = s.chars().last().ok_or(ParseCardError::Empty)?;
        let value_str = &s[..s.len() - suit_char.len_utf8()];

        let value = value_str.parse::<Value>()?;
        let suit = Suit::from_char(suit_char).ok_or(ParseCardError::Suit(suit_char))?;

        Ok(Card::new(value, suit))
    }
}

/// Card value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Ace
    #[serde(rename = "A")]
    Ace = 1,
    /// Two
    #[serde(rename = "2")]
    Two,
    /// Three
    #[serde(rename = "3")]
    Three,
    /// Four
    #[serde(rename = "4")]
    Four,
    /// Five
    #[serde(rename = "5")]
    Five,
    /// Six
    #[serde(rename = "6")]
    Six,
    /// Seven
    #[serde(rename = "7")]
    Seven,
    /// Eight
    #[serde(rename = "8")]
    Eight,
    /// Nine
    #[serde(rename = "9")]
    Nine,
    /// Ten
    #[serde(rename = "10")]
    Ten,
    /// Jack
    #[serde(rename = "J")]
    Jack,
    /// Queen
    #[serde(rename = "Q")]
    Queen,
    /// King
    #[serde(rename = "K")]
    King,
}

impl Value {
    /// Returns all values in the order they appear on the card picker.
    pub fn values() -> impl DoubleEndedIterator<Item = Value> {
        use Value::*;
        [
            Ace, Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King,
        ]
        .into_iter()
    }

    /// The points this card adds to a hand, with an ace counted as 11.
    pub fn points(&self) -> u32 {
        match self {
            Value::Ace => 11,
            Value::Jack | Value::Queen | Value::King => 10,
            v => *v as u32,
        }
    }

    /// Checks if this is an ace.
    pub fn is_ace(&self) -> bool {
        matches!(self, Value::Ace)
    }

    /// Maps a single picker key to a value, `t` and `0` stand for ten.
    pub fn from_char(c: char) -> Option<Value> {
        let value = match c.to_ascii_uppercase() {
            'A' => Value::Ace,
            '2' => Value::Two,
            '3' => Value::Three,
            '4' => Value::Four,
            '5' => Value::Five,
            '6' => Value::Six,
            '7' => Value::Seven,
            '8' => Value::Eight,
            '9' => Value::Nine,
            'T' | '0' => Value::Ten,
            'J' => Value::Jack,
            'Q' => Value::Queen,
            'K' => Value::King,
            _ => return None,
        };

        Some(value)
    }
}

impl FromStr for Value {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(ParseCardError::Empty),
            (Some(c), None) if c != '0' => {
                Value::from_char(c).ok_or_else(|| ParseCardError::Value(s.to_string()))
            }
            _ if s == "10" => Ok(Value::Ten),
            _ => Err(ParseCardError::Value(s.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Value::Ace => "A",
            Value::Two => "2",
            Value::Three => "3",
            Value::Four => "4",
            Value::Five => "5",
            Value::Six => "6",
            Value::Seven => "7",
            Value::Eight => "8",
            Value::Nine => "9",
            Value::Ten => "10",
            Value::Jack => "J",
            Value::Queen => "Q",
            Value::King => "K",
        };

        f.pad(value)
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    #[serde(rename = "♣")]
    Clubs,
    /// Diamonds suit.
    #[serde(rename = "♦")]
    Diamonds,
    /// Hearts suit.
    #[serde(rename = "♥")]
    Hearts,
    /// Spades suit.
    #[serde(rename = "♠")]
    Spades,
}

impl Suit {
    /// Maps a suit letter or symbol to a suit.
    pub fn from_char(c: char) -> Option<Suit> {
        match c {
            'c' | 'C' | '♣' => Some(Suit::Clubs),
            'd' | 'D' | '♦' => Some(Suit::Diamonds),
            'h' | 'H' | '♥' => Some(Suit::Hearts),
            's' | 'S' | '♠' => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Checks if this is a red suit.
    pub fn is_red(&self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        };

        write!(f, "{suit}")
    }
}

/// Error returned when parsing a card from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    /// The input string is empty.
    #[error("empty card")]
    Empty,
    /// Unknown card value.
    #[error("invalid card value '{0}'")]
    Value(String),
    /// Unknown card suit.
    #[error("invalid card suit '{0}'")]
    Suit(char),
}
