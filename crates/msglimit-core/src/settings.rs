use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Default number of retained messages.
pub const DEFAULT_LIMIT: usize = 10;

/// Default trim step. A step of one trims to exactly `limit` on every call.
pub const DEFAULT_ADVANCE_COUNT: NonZeroUsize = NonZeroUsize::MIN;

/// Configuration for the message limit trimmer.
///
/// Field names on the wire match the persisted extension settings
/// (`enabled`, `quietPrompts`, `limit`, `advanceCount`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLimitSettings {
    /// Master switch. When off the trimmer never touches a history.
    pub enabled: bool,
    /// Whether background (quiet) generations are trimmed too.
    pub quiet_prompts: bool,
    /// Maximum number of trailing messages kept in steady state.
    pub limit: usize,
    /// How many messages the window start moves by at once.
    pub advance_count: NonZeroUsize,
}

impl Default for MessageLimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            quiet_prompts: false,
            limit: DEFAULT_LIMIT,
            advance_count: DEFAULT_ADVANCE_COUNT,
        }
    }
}

impl MessageLimitSettings {
    /// Enabled settings with the given limit and step.
    ///
    /// A zero `advance_count` is clamped to one.
    pub fn enabled(limit: usize, advance_count: usize) -> Self {
        Self {
            enabled: true,
            limit,
            advance_count: clamp_advance_count(advance_count),
            ..Self::default()
        }
    }

    /// Returns a copy that also applies to quiet generations.
    pub fn with_quiet_prompts(mut self, quiet_prompts: bool) -> Self {
        self.quiet_prompts = quiet_prompts;
        self
    }
}

/// Clamps an externally supplied step to the `>= 1` domain.
pub fn clamp_advance_count(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap_or(NonZeroUsize::MIN)
}

/// Rounds a user-supplied number and clamps it to at least `min`.
///
/// Returns `None` for NaN and infinities.
pub fn round_clamped(value: f64, min: usize) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    // float-to-int `as` saturates, so huge values land on usize::MAX
    Some((value.round() as usize).max(min))
}

/// Anything that can report the trimming configuration in effect right now.
///
/// The interceptor asks its source on every call, so a source backed by a
/// live settings service sees every write immediately.
pub trait SettingsSource: Send + Sync {
    /// Snapshot of the current settings.
    fn current(&self) -> MessageLimitSettings;
}

impl SettingsSource for MessageLimitSettings {
    fn current(&self) -> MessageLimitSettings {
        *self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = MessageLimitSettings::default();
        assert!(!s.enabled);
        assert!(!s.quiet_prompts);
        assert_eq!(s.limit, 10);
        assert_eq!(s.advance_count.get(), 1);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_value(MessageLimitSettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "enabled": false,
                "quietPrompts": false,
                "limit": 10,
                "advanceCount": 1
            })
        );
    }

    #[test]
    fn test_zero_advance_rejected_on_deserialize() {
        let res: Result<MessageLimitSettings, _> = serde_json::from_str(
            r#"{"enabled":true,"quietPrompts":false,"limit":3,"advanceCount":0}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_round_clamped() {
        assert_eq!(round_clamped(4.4, 0), Some(4));
        assert_eq!(round_clamped(4.5, 0), Some(5));
        assert_eq!(round_clamped(-3.0, 0), Some(0));
        assert_eq!(round_clamped(0.2, 1), Some(1));
        assert_eq!(round_clamped(f64::NAN, 0), None);
        assert_eq!(round_clamped(f64::INFINITY, 1), None);
        assert_eq!(round_clamped(1e30, 0), Some(usize::MAX));
    }

    #[test]
    fn test_enabled_constructor_clamps_step() {
        let s = MessageLimitSettings::enabled(4, 0);
        assert!(s.enabled);
        assert_eq!(s.limit, 4);
        assert_eq!(s.advance_count.get(), 1);
    }
}
