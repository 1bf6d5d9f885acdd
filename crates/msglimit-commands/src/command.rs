use msglimit_core::MsgLimitResult;
use serde::{Deserialize, Serialize};

/// Type of value a command returns (always rendered as a string).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    Boolean,
    Number,
}

/// Type of the single unnamed argument a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    String,
    Number,
}

/// Metadata describing a command's interface, used for help output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub help: String,
    pub returns: ReturnKind,
    pub argument_description: String,
    pub argument_kind: ArgumentKind,
    /// Whether the host should insist on an argument. The commands treat a
    /// missing argument as a read either way.
    pub argument_required: bool,
    /// Literal values offered for completion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub argument_values: Vec<String>,
}

/// A named get/set operation over the shared settings.
pub trait ControlCommand: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    /// Runs the command. `None` (or a blank argument) only reads the value.
    /// The returned string is the value after the command ran.
    fn execute(&self, argument: Option<&str>) -> MsgLimitResult<String>;
}
