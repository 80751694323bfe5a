//! Session guard timing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How long the guard waits for a fresh credential to become usable
/// before fetching the staff profile.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Initial wait after a principal appears
    #[serde(default = "default_stabilization_delay")]
    pub stabilization_delay_ms: u64,

    /// Attempts at obtaining a bearer credential before giving up
    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,

    /// Backoff before the second attempt; doubles after each failure
    #[serde(default = "default_readiness_backoff")]
    pub readiness_backoff_ms: u64,
}

impl SessionConfig {
    pub fn stabilization_delay(&self) -> Duration {
        Duration::from_millis(self.stabilization_delay_ms)
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.readiness_backoff_ms.saturating_mul(factor))
    }

    /// No waiting at all; used by tests and tools.
    pub fn immediate() -> Self {
        Self {
            stabilization_delay_ms: 0,
            readiness_attempts: 1,
            readiness_backoff_ms: 0,
        }
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.readiness_attempts == 0 {
            return Err(ValidationError::InvalidReadinessAttempts);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stabilization_delay_ms: default_stabilization_delay(),
            readiness_attempts: default_readiness_attempts(),
            readiness_backoff_ms: default_readiness_backoff(),
        }
    }
}

fn default_stabilization_delay() -> u64 {
    100
}

fn default_readiness_attempts() -> u32 {
    3
}

fn default_readiness_backoff() -> u64 {
    100
}
