use std::time::{Duration, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

pub fn new_uuid() -> u128 {
    Uuid::new_v4().as_u128()
}

/// Seconds since UNIX_EPOCH, 0 if the clock reads before it.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
