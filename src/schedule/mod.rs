//! Background timers for midnight rotation and retention sweeps.
//!
//! Each timer owns one named thread that sleeps on a stop channel, so shutdown
//! interrupts the sleep immediately instead of waiting for the next fire.

use crate::internal;
use chrono::{DateTime, Local, TimeZone};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Fallback period when local midnight cannot be resolved (DST gaps).
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Added to the midnight deadline so the task never observes the old date.
pub const MIDNIGHT_EPSILON: Duration = Duration::from_millis(100);

/// Time left until the next local midnight after `now`.
#[must_use]
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let tz = now.timezone();
    now.date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .and_then(|midnight| (midnight - now.clone()).to_std().ok())
        .unwrap_or(DAY)
}

/// Delay before a midnight-aligned task fires, measured from the current local time.
#[must_use]
pub fn next_local_midnight() -> Duration {
    until_next_midnight(&Local::now()) + MIDNIGHT_EPSILON
}

/// Handle to a running timer thread. Dropping it stops the timer without waiting.
#[derive(Debug)]
pub struct TimerHandle {
    stop: Option<flume::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Signals the timer to stop; a task already running finishes first.
    pub fn stop(&mut self) {
        self.stop.take();
    }

    /// Signals stop and waits for the thread to exit.
    pub fn join(mut self) {
        self.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs `task` after every delay returned by `next_delay`, until the handle stops it.
///
/// `next_delay` is re-evaluated before each sleep so midnight-aligned timers re-arm
/// against the wall clock instead of drifting.
///
/// # Errors
/// Returns the spawn error if the OS refuses a new thread.
pub fn spawn<D, T>(name: &str, mut next_delay: D, mut task: T) -> std::io::Result<TimerHandle>
where
    D: FnMut() -> Duration + Send + 'static,
    T: FnMut() + Send + 'static,
{
    let (stop_tx, stop_rx) = flume::bounded::<()>(1);
    let scope = name.to_string();

    let thread = thread::Builder::new().name(name.to_string()).spawn(move || {
        loop {
            let delay = next_delay();
            internal::debug(&scope, &format!("Next run in {}s", delay.as_secs()));
            match stop_rx.recv_timeout(delay) {
                Err(flume::RecvTimeoutError::Timeout) => task(),
                // Sender dropped or explicit stop
                Ok(()) | Err(flume::RecvTimeoutError::Disconnected) => break,
            }
        }
        internal::debug(&scope, "Timer stopped");
    })?;

    Ok(TimerHandle {
        stop: Some(stop_tx),
        thread: Some(thread),
    })
}
