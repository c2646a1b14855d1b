//! Process-wide monotonic write clock.
//!
//! Microsecond resolution (what Postgres stores). Every call returns a value
//! strictly greater than the previous one, so creation order is `created_at`
//! order and every update moves `updated_at` forward.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;

static LAST_MICROS: AtomicI64 = AtomicI64::new(0);

pub fn now() -> DateTimeWithTimeZone {
    tick(0)
}

/// Like [`now`], but also strictly after `prev` (which may come from another process).
pub fn after(prev: &DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    tick(prev.timestamp_micros() + 1)
}

fn tick(floor: i64) -> DateTimeWithTimeZone {
    let wall = Utc::now().timestamp_micros().max(floor);
    let mut last = LAST_MICROS.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last + 1);
        match LAST_MICROS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => {
                let ts = DateTime::<Utc>::from_timestamp_micros(next).unwrap_or_else(Utc::now);
                return ts.fixed_offset();
            }
            Err(observed) => last = observed,
        }
    }
}
