use std::{sync::OnceLock, time::Instant};

const NANOS_PER_MILLI: u128 = 1_000_000;

pub trait Clock: std::fmt::Debug + Send + Sync {
    /// Returns the current time in milliseconds.
    fn now(&self) -> u64;
}

/// A clock backed by the platform's monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        now()
    }
}

/// The reference point every reading is measured from.
/// Set by the first call to [`now`] in the process.
fn origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

/// Returns the number of milliseconds elapsed since an unspecified reference point.
///
/// The value never decreases within a process, so it is only meaningful
/// for measuring intervals. It has no relation to wall-clock time.
pub fn now() -> u64 {
    let origin = origin();
    let nanos = Instant::now().saturating_duration_since(origin).as_nanos();
    (nanos / NANOS_PER_MILLI) as u64
}
