//! In-process gateway without durable storage.
//!
//! Used by hosts that keep state only for one session and by tests that need
//! to observe what the store wrote.

use crate::repo::gateway::{GatewayError, GatewayResult, ProjectGateway};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    text: Option<String>,
    save_count: usize,
    failing: bool,
}

/// Gateway keeping the last saved document in memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that loads `text` until the first save.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                text: Some(text.into()),
                ..MemoryState::default()
            }),
        }
    }

    /// Returns the last saved (or seeded) document.
    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    /// Returns how many saves succeeded.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Makes every following load/save fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProjectGateway for MemoryGateway {
    fn load(&self) -> GatewayResult<Option<String>> {
        let state = self.lock();
        if state.failing {
            return Err(GatewayError::Unavailable(
                "memory gateway is in failing mode".to_string(),
            ));
        }
        Ok(state
            .text
            .as_ref()
            .filter(|text| !text.trim().is_empty())
            .cloned())
    }

    fn save(&self, text: &str) -> GatewayResult<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(GatewayError::Unavailable(
                "memory gateway is in failing mode".to_string(),
            ));
        }
        state.text = Some(text.to_string());
        state.save_count += 1;
        Ok(())
    }
}
