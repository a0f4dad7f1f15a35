// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Minimum interval between requests.
use tokio::time::{Duration, Instant};

/// The default delay between two requests.
pub const REQUEST_DELAY: Duration = Duration::from_millis(3000);

/// Rejects requests issued less than a delay after the last completion.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    last_completed: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_completed: None,
        }
    }

    /// Checks if a request is allowed now, returns the time left to wait if
    /// it is not.
    pub fn check(&self) -> Result<(), Duration> {
        match self.last_completed {
            Some(last) => {
                let elapsed = last.elapsed();
                if elapsed < self.delay {
                    Err(self.delay - elapsed)
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }

    /// Records a successful request completion.
    pub fn complete(&mut self) {
        self.last_completed = Some(Instant::now());
    }
}
