//! Core types and error definitions for msglimit.
//!
//! This crate provides the types shared by the trimmer, the settings layer
//! and the command surface.
//!
//! # Main types
//!
//! - [`MsgLimitError`] — Unified error enum for all msglimit crates.
//! - [`MsgLimitResult`] — Convenience alias for `Result<T, MsgLimitError>`.
//! - [`Message`] / [`Role`] — A single chat entry and its author.
//! - [`InvocationKind`] — Which kind of generation request is being prepared.
//! - [`AbortHandle`] — Shared flag an interceptor can use to cancel generation.
//! - [`MessageLimitSettings`] — The trimming configuration.
//! - [`SettingsSource`] — Anything that can hand out the current settings.

/// Error types.
pub mod error;
/// Generation invocation kinds and the abort handle.
pub mod invocation;
/// Chat message types.
pub mod message;
/// Trimming configuration.
pub mod settings;

pub use error::{MsgLimitError, MsgLimitResult};
pub use invocation::{AbortHandle, InvocationKind};
pub use message::{Message, Role};
pub use settings::{
    clamp_advance_count, round_clamped, MessageLimitSettings, SettingsSource, DEFAULT_ADVANCE_COUNT,
    DEFAULT_LIMIT,
};
