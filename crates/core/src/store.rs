// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Persisted hands and token.
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::session::Hands;

/// The store file name in the data directory.
const STORE_FILE: &str = "storage.json";

/// Returns the platform data directory for this application.
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "hitstand")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Cannot find a home directory"))
}

/// The persisted document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stored {
    #[serde(default)]
    hands: Hands,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secret_token: Option<String>,
}

/// A JSON file store for the hands and the API token.
///
/// Every update is written to disk before returning.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    stored: Stored,
}

impl Store {
    /// Opens a store in the given directory, creating the directory if needed.
    ///
    /// A missing store file is an empty store.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create data directory {}", dir.display()))?;

        let path = dir.join(STORE_FILE);
        let stored = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Invalid store file {}", path.display()))?
        } else {
            Stored::default()
        };

        debug!("Opened store {}", path.display());

        Ok(Self { path, stored })
    }

    /// The store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted hands.
    pub fn hands(&self) -> &Hands {
        &self.stored.hands
    }

    /// Persists the hands, the stored hands are unchanged if the write fails.
    pub fn save_hands(&mut self, hands: &Hands) -> Result<()> {
        let prev = std::mem::replace(&mut self.stored.hands, hands.clone());
        if let Err(e) = self.flush() {
            self.stored.hands = prev;
            return Err(e);
        }

        Ok(())
    }

    /// The persisted API token.
    pub fn token(&self) -> Option<&str> {
        self.stored.secret_token.as_deref()
    }

    /// Persists the API token.
    pub fn save_token(&mut self, token: String) -> Result<()> {
        self.stored.secret_token = Some(token);
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.stored)?;

        // Write to a temp file and rename so a crash never leaves a partial file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).with_context(|| format!("Cannot write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Cannot write {}", self.path.display()))?;

        Ok(())
    }
}
