use msglimit_core::{clamp_advance_count, round_clamped, MessageLimitSettings};
use serde_json::{Map, Value};
use tracing::warn;

/// Result of turning a persisted section into live settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// The settings to run with.
    pub settings: MessageLimitSettings,
    /// No usable section existed; defaults were used wholesale.
    pub created: bool,
    /// Keys that were missing and filled in from the defaults.
    pub backfilled: Vec<&'static str>,
    /// Keys whose stored value was out of range or of the wrong type.
    pub sanitized: Vec<&'static str>,
}

impl LoadOutcome {
    /// Whether the store should be updated to match [`LoadOutcome::settings`].
    pub fn needs_write(&self) -> bool {
        self.created || !self.backfilled.is_empty() || !self.sanitized.is_empty()
    }
}

/// Builds settings from a persisted section.
///
/// Missing keys are taken from the defaults and present keys are never
/// overwritten, except when their value cannot be used: numbers are rounded
/// and clamped (`limit >= 0`, `advanceCount >= 1`), and values of the wrong
/// type fall back to the default.
pub fn resolve_section(section: Option<Value>) -> LoadOutcome {
    let defaults = MessageLimitSettings::default();
    let map = match section {
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!(value = %other, "Stored message limit settings are not an object, using defaults");
            return created(defaults);
        }
        None => return created(defaults),
    };

    let mut outcome = LoadOutcome {
        settings: defaults,
        created: false,
        backfilled: Vec::new(),
        sanitized: Vec::new(),
    };

    if let Some(v) = field(&map, "enabled", &mut outcome) {
        match v.as_bool() {
            Some(b) => outcome.settings.enabled = b,
            None => outcome.sanitized.push("enabled"),
        }
    }
    if let Some(v) = field(&map, "quietPrompts", &mut outcome) {
        match v.as_bool() {
            Some(b) => outcome.settings.quiet_prompts = b,
            None => outcome.sanitized.push("quietPrompts"),
        }
    }
    if let Some(v) = field(&map, "limit", &mut outcome) {
        match v.as_f64().and_then(|n| round_clamped(n, 0)) {
            Some(limit) => {
                if v.as_u64().is_none() {
                    outcome.sanitized.push("limit");
                }
                outcome.settings.limit = limit;
            }
            None => outcome.sanitized.push("limit"),
        }
    }
    if let Some(v) = field(&map, "advanceCount", &mut outcome) {
        match v.as_f64().and_then(|n| round_clamped(n, 1)) {
            Some(advance) => {
                if !matches!(v.as_u64(), Some(n) if n > 0) {
                    outcome.sanitized.push("advanceCount");
                }
                outcome.settings.advance_count = clamp_advance_count(advance);
            }
            None => outcome.sanitized.push("advanceCount"),
        }
    }

    if !outcome.sanitized.is_empty() {
        warn!(keys = ?outcome.sanitized, "Sanitized stored message limit settings");
    }
    outcome
}

fn created(settings: MessageLimitSettings) -> LoadOutcome {
    LoadOutcome {
        settings,
        created: true,
        backfilled: Vec::new(),
        sanitized: Vec::new(),
    }
}

/// Looks up a present, non-null key; records it as backfilled otherwise.
fn field<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
    outcome: &mut LoadOutcome,
) -> Option<&'a Value> {
    match map.get(key) {
        Some(Value::Null) | None => {
            outcome.backfilled.push(key);
            None
        }
        Some(v) => Some(v),
    }
}
