//! Replay scripts.
//!
//! A script is a JSON array of steps, each a raw notification plus the time
//! it fires at:
//!
//! ```json
//! [
//!   { "at_ms": 0, "platform": "ios", "name": "keyboardWillShow",
//!     "payload": { "height": 336, "duration": 0.25, "curve": 7 } }
//! ]
//! ```

use std::path::{Path, PathBuf};

use keyboard_core::RawNotification;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The script file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Script path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The script is not valid JSON or has the wrong shape.
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
}

/// One scheduled notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Delivery time from the start of the replay.
    pub at_ms: u64,
    /// The native notification.
    #[serde(flatten)]
    pub notification: RawNotification,
}

/// A parsed script, ordered by delivery time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayScript {
    steps: Vec<ScriptStep>,
}

impl ReplayScript {
    /// Build a script from steps; steps with equal times keep their order.
    #[must_use]
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|step| step.at_ms);
        Self { steps }
    }

    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Json`] if the text is not a step array.
    pub fn parse(json: &str) -> Result<Self, ReplayError> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Ok(Self::new(steps))
    }

    /// Load a script from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Io`] if the file cannot be read, or
    /// [`ReplayError::Json`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Steps in delivery order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time of the last step.
    #[must_use]
    pub fn last_at_ms(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyboard_core::Platform;

    #[test]
    fn test_parse_sorts_stably() {
        let script = ReplayScript::parse(
            r#"[
                {"at_ms": 50, "platform": "ios", "name": "keyboardWillHide", "payload": {"height": 0}},
                {"at_ms": 0, "platform": "android", "name": "keyboardWillShow", "payload": {"height": 300}},
                {"at_ms": 50, "platform": "ios", "name": "keyboardDidHide", "payload": {"height": 0}}
            ]"#,
        )
        .expect("parse");

        let names: Vec<_> = script
            .steps()
            .iter()
            .map(|step| step.notification.name.as_str())
            .collect();
        assert_eq!(names, ["keyboardWillShow", "keyboardWillHide", "keyboardDidHide"]);
        assert_eq!(script.steps()[0].notification.platform, Platform::Android);
        assert_eq!(script.last_at_ms(), 50);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = ReplayScript::parse(r#"{"at_ms": 0}"#).expect_err("not an array");
        assert!(matches!(err, ReplayError::Json(_)));
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let script =
            ReplayScript::parse(r#"[{"at_ms": 0, "platform": "ios", "name": "keyboardDidShow"}]"#)
                .expect("parse");
        assert!(script.steps()[0].notification.payload.is_null());
    }
}
