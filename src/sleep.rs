use std::time::Duration;

use tracing::{debug, trace};

use crate::{interrupt, Interrupted};

/// Blocks the calling thread for at least `duration_ms` milliseconds.
/// Negative durations are treated as zero.
///
/// Returns [`Interrupted`] if the thread is interrupted through an
/// [`crate::Interrupter`] before the duration elapses, or if it was already
/// interrupted when `sleep` was called. The interruption status is cleared
/// when that happens. The sleep is not retried.
pub fn sleep(duration_ms: i64) -> Result<(), Interrupted> {
    let duration = Duration::from_millis(duration_ms.max(0) as u64);

    trace!(duration_ms = duration.as_millis() as u64, "sleeping");

    if interrupt::with_current(|status| status.wait(duration)) {
        debug!(duration_ms = duration.as_millis() as u64, "sleep interrupted");
        return Err(Interrupted);
    }

    Ok(())
}
