use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock seconds since the Unix epoch, `0` if the clock is before it.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// `now + forward` clamped to the representable range.
pub fn shifted_now(forward: i64) -> u64 {
    let now = unix_now();
    if forward >= 0 {
        now.saturating_add(forward as u64)
    } else {
        now.saturating_sub(forward.unsigned_abs())
    }
}
