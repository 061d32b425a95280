//! Per-thread interruption status.
//!
//! Every thread owns a flag that other threads can raise through an
//! [`Interrupter`]. A thread blocked in [`crate::sleep`] is woken as soon as its
//! flag is raised.

use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

thread_local! {
    static CURRENT: Arc<Status> = Arc::new(Status::default());
}

#[derive(Debug, Default)]
pub(crate) struct Status {
    /// `true` when the owning thread has been asked to stop waiting.
    interrupted: Mutex<bool>,
    /// Notified every time `interrupted` is raised.
    wakeup: Condvar,
}

impl Status {
    fn lock(&self) -> MutexGuard<'_, bool> {
        // The guarded value is a plain flag, a panic while holding the lock cannot leave it torn.
        self.interrupted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn raise(&self) {
        let mut interrupted = self.lock();
        *interrupted = true;
        self.wakeup.notify_all();
    }

    fn take(&self) -> bool {
        std::mem::take(&mut *self.lock())
    }

    fn is_raised(&self) -> bool {
        *self.lock()
    }

    /// Blocks for `duration` or until the flag is raised, whichever comes first.
    ///
    /// Returns `true` when the wait ended because of an interruption. The flag
    /// is cleared in that case.
    pub(crate) fn wait(&self, duration: Duration) -> bool {
        // `None` when the deadline is too far away to be represented.
        let deadline = Instant::now().checked_add(duration);

        let mut interrupted = self.lock();

        loop {
            if *interrupted {
                *interrupted = false;
                return true;
            }

            interrupted = match deadline {
                None => self
                    .wakeup
                    .wait(interrupted)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return false;
                    }

                    // Spurious wakeups and timeouts both loop back so the flag and
                    // the deadline are checked again.
                    self.wakeup
                        .wait_timeout(interrupted, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }
}

/// Runs `f` with the calling thread's status.
pub(crate) fn with_current<R>(f: impl FnOnce(&Arc<Status>) -> R) -> R {
    CURRENT.with(f)
}

/// A handle that can interrupt one specific thread.
///
/// Obtain it on the thread that should be interruptible and send it to
/// whoever needs to wake that thread up.
#[derive(Debug, Clone)]
pub struct Interrupter {
    status: Arc<Status>,
}

impl Interrupter {
    /// Returns the handle of the calling thread.
    pub fn current() -> Self {
        Self {
            status: with_current(|status| Arc::clone(status)),
        }
    }

    /// Raises the interruption status of the thread this handle belongs to.
    ///
    /// If the thread is sleeping it wakes up with [`crate::Interrupted`].
    /// Otherwise the status stays raised until the thread next sleeps or calls [`interrupted`].
    pub fn interrupt(&self) {
        self.status.raise();
    }

    /// Returns `true` if the thread's status is raised. Does not clear it.
    pub fn is_interrupted(&self) -> bool {
        self.status.is_raised()
    }
}

/// Returns whether the calling thread has been interrupted and clears its status.
pub fn interrupted() -> bool {
    with_current(|status| status.take())
}

/// Returns whether the calling thread has been interrupted. Does not clear its status.
pub fn is_interrupted() -> bool {
    with_current(|status| status.is_raised())
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread};

    use super::*;

    #[test]
    fn fresh_thread_is_not_interrupted() {
        thread::spawn(|| {
            assert!(!is_interrupted());
            assert!(!interrupted());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn interrupted_clears_the_status() {
        Interrupter::current().interrupt();

        assert!(is_interrupted());
        assert!(interrupted());
        assert!(!interrupted());
        assert!(!is_interrupted());
    }

    #[test]
    fn is_interrupted_does_not_clear_the_status() {
        let interrupter = Interrupter::current();
        interrupter.interrupt();

        assert!(is_interrupted());
        assert!(interrupter.is_interrupted());
        assert!(is_interrupted());

        interrupted();
    }

    #[test]
    fn interrupter_only_affects_its_own_thread() {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            sender.send(Interrupter::current()).unwrap();
            // Park until the main thread has interrupted us.
            while !is_interrupted() {
                thread::yield_now();
            }
        });

        let interrupter = receiver.recv().unwrap();
        interrupter.interrupt();
        handle.join().unwrap();

        assert!(interrupter.is_interrupted());
        assert!(!is_interrupted());
    }

    #[test]
    fn wait_returns_false_when_the_duration_elapses() {
        let status = Status::default();
        assert!(!status.wait(Duration::from_millis(5)));
    }

    #[test]
    fn wait_returns_true_and_clears_a_raised_flag() {
        let status = Status::default();
        status.raise();

        assert!(status.wait(Duration::from_secs(60)));
        assert!(!status.is_raised());
    }

    #[test]
    fn wait_without_representable_deadline_still_wakes_on_interrupt() {
        let status = Arc::new(Status::default());

        let waiter = {
            let status = Arc::clone(&status);
            thread::spawn(move || status.wait(Duration::MAX))
        };

        thread::sleep(Duration::from_millis(20));
        status.raise();

        assert!(waiter.join().unwrap());
    }
}
