//! Stepped trimming of chat histories.
//!
//! The trimmer keeps at most `limit` trailing messages, but only moves the
//! start of the retained window in jumps of `advance_count`. Between jumps the
//! window start stays put, so whatever a downstream model cached for the
//! retained prefix stays valid for `advance_count` turns.
//!
//! # Main entry points
//!
//! - [`trim()`] — Apply the configured trim to a history in place.
//! - [`drop_count()`] / [`target_length()`] / [`retained_range()`] — The pure
//!   computation, for callers that remove the prefix themselves.
//! - [`MessageLimitInterceptor`] — Pre-generation hook backed by a
//!   [`SettingsSource`](msglimit_core::SettingsSource).
//! - [`InterceptorChain`] — Ordered list of interceptors run before generation.
//! - [`ContextWindow`] — A rolling buffer that trims on every push.

/// Rolling chat buffer.
pub mod context;
/// Pre-generation interceptors.
pub mod interceptor;
/// The trim computation.
pub mod trimmer;

pub use context::ContextWindow;
pub use interceptor::{GenerationInterceptor, InterceptorChain, MessageLimitInterceptor};
pub use trimmer::{applies_to, drop_count, retained_range, target_length, trim, TrimTarget};
