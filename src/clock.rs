//! Wall-clock helpers shared by the client and calculation layers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, saturating to 0 on a pre-epoch clock.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
