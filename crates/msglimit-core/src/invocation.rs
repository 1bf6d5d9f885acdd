use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The kind of generation request a chat history is being prepared for.
///
/// Only [`InvocationKind::Quiet`] changes trimming behaviour; the other kinds
/// are carried so hosts can pass their request type through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationKind {
    /// A regular user-initiated generation.
    #[default]
    Normal,
    /// Background generation triggered by extensions, commands or automation.
    Quiet,
    /// Regeneration of the last reply.
    Regenerate,
    /// An alternative reply for the last message.
    Swipe,
    /// Continuation of the last reply.
    Continue,
    /// Generation on behalf of the user.
    Impersonate,
}

impl InvocationKind {
    /// Whether this is a background (quiet) request.
    pub fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// The lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Quiet => "quiet",
            Self::Regenerate => "regenerate",
            Self::Swipe => "swipe",
            Self::Continue => "continue",
            Self::Impersonate => "impersonate",
        }
    }
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "regenerate" => Ok(Self::Regenerate),
            "swipe" => Ok(Self::Swipe),
            "continue" => Ok(Self::Continue),
            "impersonate" => Ok(Self::Impersonate),
            other => Err(format!("unknown invocation kind: {other}")),
        }
    }
}

/// Cloneable cancellation flag shared between a generation pipeline and its
/// interceptors.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Creates a handle in the non-aborted state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the pending generation be cancelled.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    /// Whether [`AbortHandle::abort`] has been called on any clone.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!("quiet".parse::<InvocationKind>().unwrap(), InvocationKind::Quiet);
        assert_eq!(" Swipe ".parse::<InvocationKind>().unwrap(), InvocationKind::Swipe);
        assert_eq!("".parse::<InvocationKind>().unwrap(), InvocationKind::Normal);
        assert!("bogus".parse::<InvocationKind>().is_err());
    }

    #[test]
    fn test_only_quiet_is_quiet() {
        assert!(InvocationKind::Quiet.is_quiet());
        assert!(!InvocationKind::Normal.is_quiet());
        assert!(!InvocationKind::Impersonate.is_quiet());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&InvocationKind::Regenerate).unwrap();
        assert_eq!(json, "\"regenerate\"");
        assert_eq!(InvocationKind::Continue.to_string(), "continue");
    }

    #[test]
    fn test_abort_is_shared_between_clones() {
        let handle = AbortHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_aborted());
        clone.abort();
        assert!(handle.is_aborted());
    }
}
