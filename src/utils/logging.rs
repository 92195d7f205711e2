use serde::Serialize;
use tracing::{Level, debug};

/// Logs `value` as pretty JSON under `label`. Serialization only happens when debug
/// logging is enabled.
pub(crate) fn debug_pretty_json<T: Serialize>(label: &str, value: &T) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(json) => debug!("{label}:\n{json}"),
        Err(error) => debug!(%error, "{label}: <pretty serialize failed>"),
    }
}
