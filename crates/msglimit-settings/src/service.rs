use crate::merge::resolve_section;
use crate::store::SettingsStore;
use msglimit_core::{MessageLimitSettings, MsgLimitResult, SettingsSource};
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

/// Quiet period after the last change before settings are written.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A single settings change, broadcast to subscribers after it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    /// The master switch changed.
    Enabled(bool),
    /// Whether quiet generations are trimmed changed.
    QuietPrompts(bool),
    /// The message limit changed.
    Limit(usize),
    /// The trim step changed.
    AdvanceCount(NonZeroUsize),
}

enum SaveRequest {
    Save(MessageLimitSettings),
    Flush(oneshot::Sender<()>),
}

/// Owner of the live message limit settings.
///
/// Reads are synchronous and always see the latest write. Every setter
/// broadcasts a [`SettingsChange`] and schedules a debounced write to the
/// backing store.
pub struct SettingsService {
    state: RwLock<MessageLimitSettings>,
    changes: broadcast::Sender<SettingsChange>,
    saver: Option<mpsc::UnboundedSender<SaveRequest>>,
}

impl SettingsService {
    /// Loads the section stored under `key`, backfills and sanitizes it,
    /// writes it back if that changed anything, and starts the background
    /// writer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load(
        store: Arc<dyn SettingsStore>,
        key: impl Into<String>,
        debounce: Duration,
    ) -> MsgLimitResult<Self> {
        let key = key.into();
        let outcome = resolve_section(store.load_section(&key).await?);
        if outcome.needs_write() {
            store
                .save_section(&key, serde_json::to_value(outcome.settings)?)
                .await?;
            debug!(
                key = %key,
                created = outcome.created,
                backfilled = ?outcome.backfilled,
                "Wrote resolved message limit settings"
            );
        }

        let settings = outcome.settings;
        info!(
            enabled = settings.enabled,
            quiet_prompts = settings.quiet_prompts,
            limit = settings.limit,
            advance_count = settings.advance_count.get(),
            "Message limit settings loaded"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_saver(store, key, debounce, rx));

        Ok(Self::build(settings, Some(tx)))
    }

    /// A service that never persists anything.
    pub fn detached(settings: MessageLimitSettings) -> Self {
        Self::build(settings, None)
    }

    fn build(
        settings: MessageLimitSettings,
        saver: Option<mpsc::UnboundedSender<SaveRequest>>,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(settings),
            changes,
            saver,
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> MessageLimitSettings {
        *self.state.read()
    }

    /// Receiver for every change applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.apply(|s| {
            s.enabled = enabled;
            SettingsChange::Enabled(enabled)
        });
    }

    /// Flips the master switch and returns the new value.
    pub fn toggle_enabled(&self) -> bool {
        self.apply(|s| {
            s.enabled = !s.enabled;
            SettingsChange::Enabled(s.enabled)
        })
        .enabled
    }

    pub fn set_quiet_prompts(&self, quiet_prompts: bool) {
        self.apply(|s| {
            s.quiet_prompts = quiet_prompts;
            SettingsChange::QuietPrompts(quiet_prompts)
        });
    }

    /// Flips quiet-generation trimming and returns the new value.
    pub fn toggle_quiet_prompts(&self) -> bool {
        self.apply(|s| {
            s.quiet_prompts = !s.quiet_prompts;
            SettingsChange::QuietPrompts(s.quiet_prompts)
        })
        .quiet_prompts
    }

    pub fn set_limit(&self, limit: usize) {
        self.apply(|s| {
            s.limit = limit;
            SettingsChange::Limit(limit)
        });
    }

    pub fn set_advance_count(&self, advance_count: NonZeroUsize) {
        self.apply(|s| {
            s.advance_count = advance_count;
            SettingsChange::AdvanceCount(advance_count)
        });
    }

    /// Waits until every change made so far has been written.
    ///
    /// Returns immediately for a detached service.
    pub async fn flush(&self) {
        let Some(saver) = &self.saver else {
            return;
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        if saver.send(SaveRequest::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    fn apply<F>(&self, mutate: F) -> MessageLimitSettings
    where
        F: FnOnce(&mut MessageLimitSettings) -> SettingsChange,
    {
        let (change, snapshot) = {
            let mut state = self.state.write();
            let change = mutate(&mut *state);
            (change, *state)
        };
        debug!(?change, "Message limit setting changed");
        // no subscribers is fine
        let _ = self.changes.send(change);
        if let Some(saver) = &self.saver {
            if saver.send(SaveRequest::Save(snapshot)).is_err() {
                warn!("Settings writer has stopped, change will not be persisted");
            }
        }
        snapshot
    }
}

impl SettingsSource for SettingsService {
    fn current(&self) -> MessageLimitSettings {
        self.snapshot()
    }
}

/// Background writer. Coalesces save requests until `debounce` passes with
/// no new request, then writes the latest snapshot once.
async fn run_saver(
    store: Arc<dyn SettingsStore>,
    key: String,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<SaveRequest>,
) {
    while let Some(request) = rx.recv().await {
        let mut pending = match request {
            SaveRequest::Save(settings) => settings,
            SaveRequest::Flush(ack) => {
                let _ = ack.send(());
                continue;
            }
        };

        let mut acks = Vec::new();
        loop {
            match tokio::time::timeout(debounce, rx.recv()).await {
                Ok(Some(SaveRequest::Save(settings))) => pending = settings,
                Ok(Some(SaveRequest::Flush(ack))) => {
                    acks.push(ack);
                    break;
                }
                // sender dropped or quiet period elapsed
                Ok(None) | Err(_) => break,
            }
        }

        match serde_json::to_value(pending) {
            Ok(section) => {
                if let Err(e) = store.save_section(&key, section).await {
                    warn!(error = %e, key = %key, "Failed to save message limit settings");
                } else {
                    debug!(key = %key, "Message limit settings saved");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize message limit settings"),
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }
    debug!("Settings writer exiting");
}
