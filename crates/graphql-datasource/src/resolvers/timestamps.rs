use time::OffsetDateTime;

/// Source of the current instant for timestamp stamping.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Captures the current instant as milliseconds since the Unix epoch.
pub fn timestamp_millis(clock: &dyn Clock) -> i64 {
    let millis = clock.now().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}
