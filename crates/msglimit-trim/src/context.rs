use crate::trimmer::trim;
use msglimit_core::{InvocationKind, Message, MessageLimitSettings};

/// Rolling chat buffer that applies the stepped trim after every push.
///
/// The system prompt is held separately and never counts towards the limit.
pub struct ContextWindow {
    messages: Vec<Message>,
    system_prompt: Option<String>,
    settings: MessageLimitSettings,
    dropped: usize,
}

impl ContextWindow {
    /// Creates a window keeping at most `limit` messages, moving its start by
    /// `advance_count` at a time (clamped to at least one).
    pub fn new(limit: usize, advance_count: usize) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            settings: MessageLimitSettings::enabled(limit, advance_count),
            dropped: 0,
        }
    }

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = Some(prompt.into());
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Appends a message and trims the front if the window overflowed.
    /// Returns how many messages were evicted.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        let evicted = trim(&mut self.messages, &self.settings, InvocationKind::Normal);
        self.dropped += evicted;
        evicted
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Position, in the full history pushed so far, of the first retained
    /// message. Only changes in steps of the advance count.
    pub fn window_start(&self) -> usize {
        self.dropped
    }

    pub fn settings(&self) -> &MessageLimitSettings {
        &self.settings
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start_moves_in_steps() {
        let mut window = ContextWindow::new(4, 2);
        let mut starts = Vec::new();
        for i in 0..10 {
            window.push(Message::user(format!("m{i}")));
            starts.push(window.window_start());
        }
        // lengths 1..=4 fit; then the start jumps by 2 on every second push
        assert_eq!(starts, vec![0, 0, 0, 0, 2, 2, 4, 4, 6, 6]);
        assert_eq!(window.messages().len(), 4);
        assert_eq!(window.messages()[0].content, "m6");
    }

    #[test]
    fn test_system_prompt_not_counted() {
        let mut window = ContextWindow::new(1, 1);
        window.set_system_prompt("be brief");
        window.push(Message::user("a"));
        window.push(Message::assistant("b"));
        assert_eq!(window.system_prompt(), Some("be brief"));
        assert_eq!(window.messages().len(), 1);
        assert_eq!(window.messages()[0].content, "b");
    }

    #[test]
    fn test_clear_resets_start() {
        let mut window = ContextWindow::new(1, 1);
        window.push(Message::user("a"));
        window.push(Message::user("b"));
        assert_eq!(window.window_start(), 1);
        window.clear();
        assert!(window.messages().is_empty());
        assert_eq!(window.window_start(), 0);
    }
}
