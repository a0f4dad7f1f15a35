// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Advice request errors.
use std::time::Duration;
use thiserror::Error;

/// An error from a consult action.
///
/// None of these errors is fatal, the front-end shows them to the user and
/// the session stays usable.
#[derive(Debug, Error)]
pub enum AdviceError {
    /// The player hand has less than two cards.
    #[error("Add at least 2 player cards")]
    NotEnoughPlayerCards,
    /// The dealer hand is empty.
    #[error("Add the dealer card")]
    NoDealerCard,
    /// The last request completed less than the throttle delay ago.
    #[error("Wait {} seconds between requests", whole_seconds(*remaining))]
    Throttled {
        /// Time left before a new request is allowed.
        remaining: Duration,
    },
    /// The server replied with a non success status.
    #[error("HTTP error: {status}")]
    Http {
        /// The response status code.
        status: u16,
    },
    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server replied without an action.
    #[error("Missing action in server response")]
    MissingAction,
}

impl AdviceError {
    /// Checks if this error has been raised before sending any request.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AdviceError::NotEnoughPlayerCards
                | AdviceError::NoDealerCard
                | AdviceError::Throttled { .. }
        )
    }
}

/// Rounds a duration up to whole seconds.
fn whole_seconds(d: Duration) -> u64 {
    d.as_millis().div_ceil(1000) as u64
}
