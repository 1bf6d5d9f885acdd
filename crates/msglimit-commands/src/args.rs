use msglimit_core::{round_clamped, MsgLimitError, MsgLimitResult};

/// A parsed on/off argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolArg {
    /// Flip the current value.
    Toggle,
    /// Set an explicit value.
    Set(bool),
}

/// `on`, `true` and `1` (any case, surrounding blanks ignored) are true.
pub fn is_true_boolean(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1")
}

/// `toggle`/`t` flip; anything else is read with [`is_true_boolean`].
pub fn parse_bool_arg(value: &str) -> BoolArg {
    match value.trim().to_ascii_lowercase().as_str() {
        "toggle" | "t" => BoolArg::Toggle,
        _ => BoolArg::Set(is_true_boolean(value)),
    }
}

/// Parses a count argument, rounding to the nearest integer and clamping it
/// to at least `min`.
///
/// Fails with [`MsgLimitError::InvalidNumericInput`] for anything that is not
/// a finite number.
pub fn parse_count_arg(field: &'static str, value: &str, min: usize) -> MsgLimitResult<usize> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|n| round_clamped(n, min))
        .ok_or_else(|| MsgLimitError::InvalidNumericInput {
            field,
            value: value.to_string(),
        })
}

/// Treats a missing or blank argument as "read only".
pub(crate) fn non_blank(argument: Option<&str>) -> Option<&str> {
    argument.filter(|a| !a.trim().is_empty())
}
