use msglimit_core::{InvocationKind, MessageLimitSettings};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::ops::Range;
use tracing::debug;

/// Storage that can drop a prefix of its elements.
///
/// Surviving elements must keep their order and must not be touched.
pub trait TrimTarget {
    /// Number of elements currently held.
    fn item_count(&self) -> usize;

    /// Removes the first `count` elements. `count` never exceeds
    /// [`TrimTarget::item_count`].
    fn drop_front(&mut self, count: usize);
}

impl<T> TrimTarget for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn drop_front(&mut self, count: usize) {
        self.drain(..count);
    }
}

impl<T> TrimTarget for VecDeque<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn drop_front(&mut self, count: usize) {
        self.drain(..count);
    }
}

/// Length a sequence of `len` elements is trimmed down to.
///
/// Returns `len` unchanged when it already fits. Otherwise the result lies in
/// `(limit - advance, limit]`, floored at zero.
pub fn target_length(len: usize, limit: usize, advance: NonZeroUsize) -> usize {
    if len <= limit {
        return len;
    }
    let advance = advance.get();
    let overage = (len - limit) % advance;
    if overage == 0 {
        limit
    } else {
        // limit - advance + overage, clamped; limit + overage <= len so no overflow
        (limit + overage).saturating_sub(advance)
    }
}

/// Number of leading elements to remove from a sequence of `len` elements.
pub fn drop_count(len: usize, limit: usize, advance: NonZeroUsize) -> usize {
    len - target_length(len, limit, advance)
}

/// Whether the settings allow trimming for this kind of generation.
pub fn applies_to(settings: &MessageLimitSettings, kind: InvocationKind) -> bool {
    settings.enabled && (settings.quiet_prompts || !kind.is_quiet())
}

/// Index range of the elements that survive trimming.
///
/// Returns `0..len` whenever trimming does not apply.
pub fn retained_range(
    len: usize,
    settings: &MessageLimitSettings,
    kind: InvocationKind,
) -> Range<usize> {
    if !applies_to(settings, kind) {
        return 0..len;
    }
    drop_count(len, settings.limit, settings.advance_count)..len
}

/// Trims `history` in place and returns how many leading elements were removed.
pub fn trim<S>(history: &mut S, settings: &MessageLimitSettings, kind: InvocationKind) -> usize
where
    S: TrimTarget + ?Sized,
{
    let len = history.item_count();
    let retained = retained_range(len, settings, kind);
    let dropped = retained.start;
    if dropped > 0 {
        history.drop_front(dropped);
        debug!(
            len,
            dropped,
            kept = retained.len(),
            limit = settings.limit,
            advance = settings.advance_count.get(),
            %kind,
            "Trimmed chat history"
        );
    }
    dropped
}
