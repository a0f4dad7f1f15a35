// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hitstand session state and blackjack advice client.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use std::{path::PathBuf, time::Duration};

pub mod advice;
pub mod cache;
pub mod client;
pub mod error;
pub mod session;
pub mod store;
pub mod throttle;

pub use advice::{Action, GameRules};
pub use client::{AdviceApi, HttpClient};
pub use error::AdviceError;
pub use session::{EntryMode, HandKind, Hands, Session};
pub use store::Store;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The advice endpoint url.
    pub advice_url: String,
    /// The token endpoint url.
    pub token_url: String,
    /// Minimum time between two successful consults.
    pub request_delay: Duration,
    /// The data directory, the platform data directory if `None`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advice_url: client::ADVICE_URL.to_string(),
            token_url: client::TOKEN_URL.to_string(),
            request_delay: throttle::REQUEST_DELAY,
            data_dir: None,
        }
    }
}

impl Config {
    /// The configured data directory or the platform default.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => store::default_data_dir(),
        }
    }

    /// Creates an HTTP client for the configured endpoints.
    pub fn http_client(&self) -> HttpClient {
        HttpClient::new(&self.advice_url, &self.token_url)
    }

    /// Opens a session on the configured data directory.
    pub fn open_session(&self) -> anyhow::Result<Session> {
        let store = Store::open(self.data_dir()?)?;
        Ok(Session::open(store, self.request_delay))
    }
}
