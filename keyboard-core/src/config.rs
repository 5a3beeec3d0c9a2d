//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::DEFAULT_SETTLE_EPSILON;
use crate::{KeyboardError, KeyboardResult};

/// Default ceiling for platform-reported transition durations.
const DEFAULT_MAX_DURATION_MS: u64 = 1000;

/// Tuning knobs for the keyboard store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Drop an event whose phase and height match the previous event.
    pub collapse_duplicates: bool,
    /// Heights closer than this are treated as equal (layout units).
    pub settle_epsilon: f32,
    /// Longest transition accepted from the platform, in milliseconds.
    pub max_duration_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            collapse_duplicates: true,
            settle_epsilon: DEFAULT_SETTLE_EPSILON,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
        }
    }
}

impl ControllerConfig {
    /// Create a config from environment variables or defaults.
    ///
    /// Environment variables:
    /// - `KEYBOARD_COLLAPSE_DUPLICATES`: `true`/`false` (default: true)
    /// - `KEYBOARD_SETTLE_EPSILON`: layout units (default: 0.01)
    /// - `KEYBOARD_MAX_DURATION_MS`: milliseconds (default: 1000)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let collapse_duplicates = std::env::var("KEYBOARD_COLLAPSE_DUPLICATES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.collapse_duplicates);
        let settle_epsilon = std::env::var("KEYBOARD_SETTLE_EPSILON")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(defaults.settle_epsilon);
        let max_duration_ms = std::env::var("KEYBOARD_MAX_DURATION_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_duration_ms);
        Self {
            collapse_duplicates,
            settle_epsilon,
            max_duration_ms,
        }
    }

    /// Parse a config from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError::Serialization`] for invalid JSON and
    /// [`KeyboardError::Config`] for a negative or non-finite epsilon.
    pub fn from_json(json: &str) -> KeyboardResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        if !config.settle_epsilon.is_finite() || config.settle_epsilon < 0.0 {
            return Err(KeyboardError::Config(format!(
                "settle_epsilon must be a non-negative number, got {}",
                config.settle_epsilon
            )));
        }
        Ok(config)
    }

    /// The duration ceiling as a [`Duration`].
    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert!(config.collapse_duplicates);
        assert_eq!(config.max_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_from_json_partial() {
        let config = ControllerConfig::from_json(r#"{"collapse_duplicates": false}"#)
            .expect("valid config");
        assert!(!config.collapse_duplicates);
        assert_eq!(config.max_duration_ms, DEFAULT_MAX_DURATION_MS);
    }

    #[test]
    fn test_from_json_rejects_negative_epsilon() {
        let result = ControllerConfig::from_json(r#"{"settle_epsilon": -1.0}"#);
        assert!(matches!(result, Err(KeyboardError::Config(_))));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = ControllerConfig::from_json("not json");
        assert!(matches!(result, Err(KeyboardError::Serialization(_))));
    }
}
