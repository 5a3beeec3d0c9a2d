//! Native notification normalizing.
//!
//! Platforms describe the same keyboard transition differently:
//!
//! | Field      | iOS                                 | Android                          |
//! |------------|-------------------------------------|----------------------------------|
//! | `height`   | points (required)                   | pixels (required)                |
//! | `density`  | –                                   | px per layout unit (optional)    |
//! | `duration` | seconds (optional)                  | milliseconds (optional)          |
//! | `curve`    | `UIViewAnimationCurve` id (optional)| –                                |
//! | `interpolator` | –                               | interpolator name (optional)     |
//! | `target`   | focused input tag (optional)        | focused input tag (optional)     |
//! | `timestamp`| ms (optional)                       | ms (optional)                    |
//!
//! [`normalize`] maps both onto a [`KeyboardEvent`]. It is a pure function;
//! the store decides what to do with failures.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Easing, KeyboardEvent, KeyboardPhase};

/// Platform that emitted a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// iOS / iPadOS.
    Ios,
    /// Android.
    Android,
}

/// A raw keyboard notification as delivered by the native side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNotification {
    /// Emitting platform.
    pub platform: Platform,
    /// Native event name, e.g. `keyboardWillShow`.
    pub name: String,
    /// Platform-specific payload object.
    #[serde(default)]
    pub payload: Value,
}

impl RawNotification {
    /// Create a notification.
    #[must_use]
    pub fn new(platform: Platform, name: impl Into<String>, payload: Value) -> Self {
        Self {
            platform,
            name: name.into(),
            payload,
        }
    }
}

/// Reasons a notification cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The event name is not a keyboard lifecycle event.
    #[error("Unknown keyboard event: {0}")]
    UnknownEvent(String),
    /// The payload is not a JSON object.
    #[error("Payload is not an object")]
    NotAnObject,
    /// A required field is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// A numeric field holds something else.
    #[error("Field {0} is not a number")]
    NotANumber(&'static str),
}

/// Normalize a native notification into a canonical event.
///
/// Negative heights clamp to 0, negative durations to zero, and unknown curves
/// fall back to [`Easing::EaseInOut`].
///
/// # Errors
///
/// Returns a [`NormalizeError`] when the event name is unknown, the payload is
/// not an object, or `height` is missing or non-numeric.
pub fn normalize(raw: &RawNotification) -> Result<KeyboardEvent, NormalizeError> {
    let phase = KeyboardPhase::from_event_name(&raw.name)
        .ok_or_else(|| NormalizeError::UnknownEvent(raw.name.clone()))?;
    let payload = raw.payload.as_object().ok_or(NormalizeError::NotAnObject)?;

    let mut event = match raw.platform {
        Platform::Ios => normalize_ios(phase, payload)?,
        Platform::Android => normalize_android(phase, payload)?,
    };

    if let Some(target) = optional_number(payload, "target")? {
        #[allow(clippy::cast_possible_truncation)]
        let target = target as i64;
        event = event.with_target(target);
    }
    if let Some(timestamp) = optional_number(payload, "timestamp")? {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let timestamp = timestamp.max(0.0) as u64;
        event = event.with_timestamp(timestamp);
    }
    Ok(event)
}

fn normalize_ios(
    phase: KeyboardPhase,
    payload: &Map<String, Value>,
) -> Result<KeyboardEvent, NormalizeError> {
    let height = required_number(payload, "height")?;
    let duration = optional_number(payload, "duration")?.unwrap_or(0.0);
    let easing = match payload.get("curve") {
        Some(curve) => curve.as_i64().map_or(Easing::default(), ios_curve),
        None => Easing::default(),
    };

    #[allow(clippy::cast_possible_truncation)]
    let height = height as f32;
    Ok(KeyboardEvent::new(phase, height, seconds(duration), easing))
}

fn normalize_android(
    phase: KeyboardPhase,
    payload: &Map<String, Value>,
) -> Result<KeyboardEvent, NormalizeError> {
    let mut height = required_number(payload, "height")?;
    if let Some(density) = optional_number(payload, "density")? {
        if density > 0.0 {
            height /= density;
        }
    }
    let duration_ms = optional_number(payload, "duration")?.unwrap_or(0.0);
    let easing = payload
        .get("interpolator")
        .and_then(Value::as_str)
        .map_or(Easing::default(), android_interpolator);

    #[allow(clippy::cast_possible_truncation)]
    let height = height as f32;
    Ok(KeyboardEvent::new(phase, height, seconds(duration_ms / 1000.0), easing))
}

/// Map a `UIViewAnimationCurve` raw value.
#[must_use]
pub fn ios_curve(curve: i64) -> Easing {
    match curve {
        0 => Easing::EaseInOut,
        1 => Easing::EaseIn,
        2 => Easing::EaseOut,
        3 => Easing::Linear,
        7 => Easing::Keyboard,
        other => {
            tracing::debug!(curve = other, "unrecognized iOS curve; using ease-in-out");
            Easing::default()
        }
    }
}

/// Map an Android interpolator name.
#[must_use]
pub fn android_interpolator(name: &str) -> Easing {
    match name {
        "linear" => Easing::Linear,
        "accelerate" => Easing::EaseIn,
        "decelerate" => Easing::EaseOut,
        "accelerate_decelerate" => Easing::EaseInOut,
        "path" | "keyboard" | "fast_out_slow_in" => Easing::Keyboard,
        other => {
            tracing::debug!(interpolator = other, "unrecognized interpolator; using ease-in-out");
            Easing::default()
        }
    }
}

fn required_number(payload: &Map<String, Value>, field: &'static str) -> Result<f64, NormalizeError> {
    optional_number(payload, field)?.ok_or(NormalizeError::MissingField(field))
}

fn optional_number(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, NormalizeError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or(NormalizeError::NotANumber(field)),
    }
}

fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
