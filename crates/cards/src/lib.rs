// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hitstand blackjack cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use hitstand_cards::{Card, Suit, Value};
//! let ah = Card::new(Value::Ace, Suit::Hearts);
//! let td: Card = "10D".parse().unwrap();
//! ```
//!
//! and a [Hand] type that holds an ordered list of cards and computes its
//! total counting aces as 11 or 1:
//!
//! ```
//! # use hitstand_cards::{Card, Hand};
//! let hand = Hand::from_cards(["AH", "6D", "10C"].map(|c| c.parse::<Card>().unwrap()));
//! assert_eq!(hand.total().points, 17);
//! assert!(!hand.total().soft);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod card;
pub use card::{Card, ParseCardError, Suit, Value};

mod hand;
pub use hand::{BLACKJACK, Hand, Total, total};
