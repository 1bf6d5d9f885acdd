use crate::command::{CommandDescriptor, ControlCommand};
use msglimit_core::{MsgLimitError, MsgLimitResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Central registry for all available control commands.
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn ControlCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, command: Arc<dyn ControlCommand>) {
        let name = command.descriptor().name.clone();
        debug!(command = %name, "Registered command");
        self.commands.insert(name, command);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ControlCommand>> {
        self.commands.get(name)
    }

    /// Descriptors sorted by command name.
    pub fn list_descriptors(&self) -> Vec<&CommandDescriptor> {
        self.commands.values().map(|c| c.descriptor()).collect()
    }

    /// Runs the named command. Errors from the command are returned to the
    /// caller unchanged.
    pub fn execute(&self, name: &str, argument: Option<&str>) -> MsgLimitResult<String> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| MsgLimitError::UnknownCommand(name.to_string()))?;

        command.execute(argument).inspect_err(|e| {
            warn!(command = %name, error = %e, "Command failed");
        })
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
