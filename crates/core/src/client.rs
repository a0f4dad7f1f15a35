// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Advice API client.
use anyhow::{Result, anyhow, bail};
use log::{debug, info};
use reqwest::Client;
use std::future::Future;

use crate::{
    advice::{AdviceRequest, AdviceResponse, TokenResponse},
    error::AdviceError,
};

/// The production advice endpoint.
pub const ADVICE_URL: &str = "https://blackjack-backend-production.up.railway.app/api/advice";

/// The production token endpoint.
pub const TOKEN_URL: &str = "https://blackjack-backend-production.up.railway.app/get-token";

/// A service that recommends an action for a pair of hands.
pub trait AdviceApi {
    /// Requests advice, the token is sent as a bearer token if present.
    fn advice(
        &self,
        req: &AdviceRequest,
        token: Option<&str>,
    ) -> impl Future<Output = Result<String, AdviceError>>;
}

/// HTTP client for the advice and token endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    advice_url: String,
    token_url: String,
}

impl HttpClient {
    /// Creates a client for the given endpoints.
    pub fn new(advice_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            advice_url: advice_url.into(),
            token_url: token_url.into(),
        }
    }

    /// Fetches a new API token.
    pub async fn fetch_token(&self) -> Result<String> {
        info!("Fetching token from {}", self.token_url);

        let response = self
            .client
            .get(&self.token_url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Token request error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Server error: {}", status.as_u16());
        }

        let body = response.json::<TokenResponse>().await?;
        Ok(body.token)
    }
}

impl AdviceApi for HttpClient {
    async fn advice(&self, req: &AdviceRequest, token: Option<&str>) -> Result<String, AdviceError> {
        debug!("Sending advice request {req:?}");

        let mut builder = self.client.post(&self.advice_url).json(req);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdviceError::Http {
                status: status.as_u16(),
            });
        }

        // A success body that doesn't carry an action, or isn't JSON, is
        // reported as a missing action.
        let body = response.bytes().await?;
        serde_json::from_slice::<AdviceResponse>(&body)
            .ok()
            .and_then(|r| r.action)
            .ok_or(AdviceError::MissingAction)
    }
}
