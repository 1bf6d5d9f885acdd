use crate::args::{non_blank, parse_bool_arg, parse_count_arg, BoolArg};
use crate::command::{ArgumentKind, CommandDescriptor, ControlCommand, ReturnKind};
use crate::registry::CommandRegistry;
use msglimit_core::{clamp_advance_count, MsgLimitResult};
use msglimit_settings::SettingsService;
use std::sync::Arc;

fn on_off_toggle() -> Vec<String> {
    ["on", "off", "toggle"].iter().map(ToString::to_string).collect()
}

/// Registers `ml-state`, `ml-quiet`, `ml-limit` and `ml-advance`.
pub fn register_message_limit_commands(
    registry: &mut CommandRegistry,
    settings: Arc<SettingsService>,
) {
    registry.register(Arc::new(StateCommand::new(settings.clone())));
    registry.register(Arc::new(QuietPromptsCommand::new(settings.clone())));
    registry.register(Arc::new(LimitCommand::new(settings.clone())));
    registry.register(Arc::new(AdvanceCountCommand::new(settings)));
}

/// `ml-state`: reads or changes whether the message limit is enabled.
pub struct StateCommand {
    descriptor: CommandDescriptor,
    settings: Arc<SettingsService>,
}

impl StateCommand {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        Self {
            descriptor: CommandDescriptor {
                name: "ml-state".to_string(),
                help: "Change the message limit state. If no argument is provided, \
                    return the current state."
                    .to_string(),
                returns: ReturnKind::Boolean,
                argument_description: "Desired state of the message limit.".to_string(),
                argument_kind: ArgumentKind::String,
                argument_required: true,
                argument_values: on_off_toggle(),
            },
            settings,
        }
    }
}

impl ControlCommand for StateCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, argument: Option<&str>) -> MsgLimitResult<String> {
        if let Some(arg) = non_blank(argument) {
            match parse_bool_arg(arg) {
                BoolArg::Toggle => {
                    self.settings.toggle_enabled();
                }
                BoolArg::Set(value) => self.settings.set_enabled(value),
            }
        }
        Ok(self.settings.snapshot().enabled.to_string())
    }
}

/// `ml-quiet`: reads or changes whether background generations are trimmed.
pub struct QuietPromptsCommand {
    descriptor: CommandDescriptor,
    settings: Arc<SettingsService>,
}

impl QuietPromptsCommand {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        Self {
            descriptor: CommandDescriptor {
                name: "ml-quiet".to_string(),
                help: "Change the message limit state for background (quiet) prompts. \
                    If no argument is provided, return the current state."
                    .to_string(),
                returns: ReturnKind::Boolean,
                argument_description: "Desired state of the message limit for background \
                    prompts."
                    .to_string(),
                argument_kind: ArgumentKind::String,
                argument_required: true,
                argument_values: on_off_toggle(),
            },
            settings,
        }
    }
}

impl ControlCommand for QuietPromptsCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, argument: Option<&str>) -> MsgLimitResult<String> {
        if let Some(arg) = non_blank(argument) {
            match parse_bool_arg(arg) {
                BoolArg::Toggle => {
                    self.settings.toggle_quiet_prompts();
                }
                BoolArg::Set(value) => self.settings.set_quiet_prompts(value),
            }
        }
        Ok(self.settings.snapshot().quiet_prompts.to_string())
    }
}

/// `ml-limit`: reads or sets the number of retained messages.
pub struct LimitCommand {
    descriptor: CommandDescriptor,
    settings: Arc<SettingsService>,
}

impl LimitCommand {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        Self {
            descriptor: CommandDescriptor {
                name: "ml-limit".to_string(),
                help: "Set the maximum number of messages to send. If no argument is \
                    provided, return the current limit."
                    .to_string(),
                returns: ReturnKind::Number,
                argument_description: "Maximum number of messages to send. Must be a \
                    positive integer or zero."
                    .to_string(),
                argument_kind: ArgumentKind::Number,
                argument_required: true,
                argument_values: Vec::new(),
            },
            settings,
        }
    }
}

impl ControlCommand for LimitCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, argument: Option<&str>) -> MsgLimitResult<String> {
        if let Some(arg) = non_blank(argument) {
            let limit = parse_count_arg("Limit", arg, 0)?;
            self.settings.set_limit(limit);
        }
        Ok(self.settings.snapshot().limit.to_string())
    }
}

/// `ml-advance`: reads or sets the trim step.
pub struct AdvanceCountCommand {
    descriptor: CommandDescriptor,
    settings: Arc<SettingsService>,
}

impl AdvanceCountCommand {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        Self {
            descriptor: CommandDescriptor {
                name: "ml-advance".to_string(),
                help: "Set the number of messages to advance by when trimming chat. If no \
                    argument is provided, return the current advance count."
                    .to_string(),
                returns: ReturnKind::Number,
                argument_description: "Number of messages to advance by. Must be a \
                    positive integer."
                    .to_string(),
                argument_kind: ArgumentKind::Number,
                argument_required: false,
                argument_values: Vec::new(),
            },
            settings,
        }
    }
}

impl ControlCommand for AdvanceCountCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, argument: Option<&str>) -> MsgLimitResult<String> {
        if let Some(arg) = non_blank(argument) {
            let advance = parse_count_arg("Advance count", arg, 1)?;
            self.settings.set_advance_count(clamp_advance_count(advance));
        }
        Ok(self.settings.snapshot().advance_count.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use msglimit_core::{MessageLimitSettings, MsgLimitError};

    fn service() -> Arc<SettingsService> {
        Arc::new(SettingsService::detached(MessageLimitSettings::default()))
    }

    #[test]
    fn test_state_get_set_toggle() {
        let settings = service();
        let cmd = StateCommand::new(settings.clone());
        assert_eq!(cmd.execute(None).unwrap(), "false");
        assert_eq!(cmd.execute(Some("on")).unwrap(), "true");
        assert_eq!(cmd.execute(Some("toggle")).unwrap(), "false");
        assert_eq!(cmd.execute(Some("t")).unwrap(), "true");
        assert_eq!(cmd.execute(Some("off")).unwrap(), "false");
        assert!(!settings.snapshot().enabled);
    }

    #[test]
    fn test_quiet_get_set() {
        let settings = service();
        let cmd = QuietPromptsCommand::new(settings.clone());
        assert_eq!(cmd.execute(Some("")).unwrap(), "false");
        assert_eq!(cmd.execute(Some("1")).unwrap(), "true");
        assert!(settings.snapshot().quiet_prompts);
        // enabling quiet trimming leaves the master switch alone
        assert!(!settings.snapshot().enabled);
    }

    #[test]
    fn test_limit_sets_and_clamps() {
        let settings = service();
        let cmd = LimitCommand::new(settings.clone());
        assert_eq!(cmd.execute(None).unwrap(), "10");
        assert_eq!(cmd.execute(Some("25")).unwrap(), "25");
        assert_eq!(cmd.execute(Some("-3")).unwrap(), "0");
        assert_eq!(cmd.execute(Some("4.6")).unwrap(), "5");
    }

    #[test]
    fn test_limit_rejects_garbage_without_mutation() {
        let settings = service();
        let cmd = LimitCommand::new(settings.clone());
        cmd.execute(Some("7")).unwrap();
        let err = cmd.execute(Some("lots")).unwrap_err();
        assert!(matches!(err, MsgLimitError::InvalidNumericInput { field: "Limit", .. }));
        assert_eq!(settings.snapshot().limit, 7);
    }

    #[test]
    fn test_advance_clamps_to_one() {
        let settings = service();
        let cmd = AdvanceCountCommand::new(settings.clone());
        assert_eq!(cmd.execute(None).unwrap(), "1");
        assert_eq!(cmd.execute(Some("0")).unwrap(), "1");
        assert_eq!(cmd.execute(Some("6")).unwrap(), "6");
        let err = cmd.execute(Some("Infinity")).unwrap_err();
        assert!(matches!(
            err,
            MsgLimitError::InvalidNumericInput { field: "Advance count", .. }
        ));
        assert_eq!(settings.snapshot().advance_count.get(), 6);
    }
}
