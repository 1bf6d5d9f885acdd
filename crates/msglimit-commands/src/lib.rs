//! Control commands for the message limit settings.
//!
//! Four commands are provided, each of which returns the current value when
//! called without an argument and sets it otherwise:
//!
//! - `ml-state` — master switch (`on`/`off`/`toggle`).
//! - `ml-quiet` — whether background generations are trimmed.
//! - `ml-limit` — number of retained messages.
//! - `ml-advance` — trim step.
//!
//! Setters go through [`SettingsService`](msglimit_settings::SettingsService),
//! so every change is broadcast and persisted.

/// Argument parsing shared by the commands.
pub mod args;
/// The four message limit commands.
pub mod builtins;
/// Command trait and descriptor.
pub mod command;
/// Name-indexed command registry.
pub mod registry;

pub use args::{is_true_boolean, parse_bool_arg, parse_count_arg, BoolArg};
pub use builtins::{
    register_message_limit_commands, AdvanceCountCommand, LimitCommand, QuietPromptsCommand,
    StateCommand,
};
pub use command::{ArgumentKind, CommandDescriptor, ControlCommand, ReturnKind};
pub use registry::CommandRegistry;
