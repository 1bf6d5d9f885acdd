//! Persisted settings for the message limit trimmer.
//!
//! Settings live in a JSON document shared with other extensions, under one
//! key per extension. Loading backfills missing keys from the defaults and
//! sanitizes out-of-range values. The [`SettingsService`] owns the live copy,
//! broadcasts every change, and writes back to the store after a debounce.

/// Default backfill and value sanitizing.
pub mod merge;
/// Shared settings service.
pub mod service;
/// Settings storage backends.
pub mod store;

pub use merge::{resolve_section, LoadOutcome};
pub use service::{SettingsChange, SettingsService, DEFAULT_SAVE_DEBOUNCE};
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};

/// Key under which the message limit settings are stored.
pub const SETTINGS_KEY: &str = "messageLimit";
