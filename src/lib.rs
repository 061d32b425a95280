//! Monotonic time in milliseconds and an interruptible thread sleep.

mod clock;
mod error;
mod interrupt;
mod sleep;

pub use clock::{now, Clock, SystemClock};
pub use error::Interrupted;
pub use interrupt::{interrupted, is_interrupted, Interrupter};
pub use sleep::sleep;
