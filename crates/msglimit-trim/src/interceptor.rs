use crate::trimmer::trim;
use msglimit_core::{AbortHandle, InvocationKind, Message, SettingsSource};
use std::sync::Arc;
use tracing::{debug, info};

/// Hook invoked on the outgoing chat history right before a generation
/// request is dispatched.
///
/// Interceptors run synchronously on the caller's thread and may edit the
/// history in place. They can cancel the generation through the abort handle.
pub trait GenerationInterceptor: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Inspect or edit `chat` before generation.
    ///
    /// `context_size` is the host's context budget hint, if it has one.
    fn intercept(
        &self,
        chat: &mut Vec<Message>,
        context_size: Option<usize>,
        abort: &AbortHandle,
        kind: InvocationKind,
    );
}

/// Interceptor that applies the message limit to the outgoing history.
///
/// Settings are read from the source on every call.
pub struct MessageLimitInterceptor {
    source: Arc<dyn SettingsSource>,
}

impl MessageLimitInterceptor {
    /// Name reported by [`GenerationInterceptor::name`].
    pub const NAME: &'static str = "message_limit";

    /// Creates an interceptor reading its settings from `source`.
    pub fn new(source: Arc<dyn SettingsSource>) -> Self {
        Self { source }
    }
}

impl GenerationInterceptor for MessageLimitInterceptor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn intercept(
        &self,
        chat: &mut Vec<Message>,
        _context_size: Option<usize>,
        _abort: &AbortHandle,
        kind: InvocationKind,
    ) {
        let settings = self.source.current();
        trim(chat, &settings, kind);
    }
}

/// Ordered list of interceptors run before each generation.
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn GenerationInterceptor>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Appends an interceptor; it runs after every interceptor added before it.
    pub fn add(&mut self, interceptor: Arc<dyn GenerationInterceptor>) {
        debug!(interceptor = interceptor.name(), "Registered interceptor");
        self.interceptors.push(interceptor);
    }

    /// Runs every interceptor in order.
    ///
    /// Stops as soon as one of them aborts. Returns `true` when generation
    /// may proceed.
    pub fn run(
        &self,
        chat: &mut Vec<Message>,
        context_size: Option<usize>,
        abort: &AbortHandle,
        kind: InvocationKind,
    ) -> bool {
        for interceptor in &self.interceptors {
            if abort.is_aborted() {
                break;
            }
            interceptor.intercept(chat, context_size, abort, kind);
        }
        if abort.is_aborted() {
            info!(%kind, "Generation aborted by interceptor");
            return false;
        }
        true
    }

    /// Number of registered interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether no interceptor is registered.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::new()
    }
}
