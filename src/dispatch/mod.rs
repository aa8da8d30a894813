//! Decides whether a record is written on the caller's thread or queued for the
//! consumer thread. The mode is chosen once at construction.
//!
//! Async mode blocks producers on a full queue instead of dropping records, and
//! `flush`/`close` are barriers: they return only after every record submitted before
//! them reached the output.

mod control;
mod worker;

pub use control::ControlSignal;

use crate::output::{LogRecord, Output};
use crate::{Error, internal};
use control::Control;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Which path records take to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Written under a lock on the caller's thread.
    Sync,
    /// Queued (bounded) and written by one consumer thread.
    Async,
}

enum Engine {
    Sync {
        output: Mutex<Option<Box<dyn Output>>>,
    },
    Async {
        /// Taken by `close`; producers send under the read guard.
        records: RwLock<Option<flume::Sender<LogRecord>>>,
        control: flume::Sender<Control>,
        consumer: Mutex<Option<JoinHandle<()>>>,
    },
}

/// Routes records to one output, synchronously or through a bounded queue.
pub struct Dispatcher {
    engine: Engine,
    closed: AtomicBool,
    /// One flush/close handshake at a time.
    handshake: Mutex<()>,
}

impl Dispatcher {
    /// `queue_capacity == 0` selects synchronous dispatch.
    ///
    /// # Errors
    /// The consumer thread cannot be spawned.
    pub fn new(output: Box<dyn Output>, queue_capacity: usize) -> Result<Self, Error> {
        let engine = if queue_capacity == 0 {
            Engine::Sync {
                output: Mutex::new(Some(output)),
            }
        } else {
            let (records, queue) = flume::bounded(queue_capacity);
            let (control, signals) = flume::bounded(1);
            let consumer = thread::Builder::new()
                .name("rotlog-dispatch".into())
                .spawn(move || worker::run(output, queue, signals))?;
            Engine::Async {
                records: RwLock::new(Some(records)),
                control,
                consumer: Mutex::new(Some(consumer)),
            }
        };

        internal::debug(
            "DISPATCH",
            &format!("Dispatcher ready (capacity {queue_capacity})"),
        );
        Ok(Self {
            engine,
            closed: AtomicBool::new(false),
            handshake: Mutex::new(()),
        })
    }

    #[must_use]
    pub const fn mode(&self) -> DispatchMode {
        match self.engine {
            Engine::Sync { .. } => DispatchMode::Sync,
            Engine::Async { .. } => DispatchMode::Async,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Hands one record to the output. In async mode this blocks while the queue is full.
    ///
    /// # Errors
    /// [`Error::Closed`] after `close`; in sync mode, the output's write error.
    pub fn submit(&self, record: LogRecord) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        match &self.engine {
            Engine::Sync { output } => match output.lock().as_deref() {
                Some(output) => output.write(&record),
                None => Err(Error::Closed),
            },
            Engine::Async { records, .. } => match records.read().as_ref() {
                Some(records) => records.send(record).map_err(|_| Error::Closed),
                None => Err(Error::Closed),
            },
        }
    }

    /// Returns once every record submitted before the call is written and synced.
    ///
    /// # Errors
    /// [`Error::Closed`] after `close`; otherwise the sync error, or in async mode the
    /// first write error since the previous flush.
    pub fn flush(&self) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        match &self.engine {
            Engine::Sync { output } => match output.lock().as_deref() {
                Some(output) => output.flush(),
                None => Err(Error::Closed),
            },
            Engine::Async { control, .. } => {
                let _turn = self.handshake.lock();
                handshake(control, ControlSignal::Flush)
            }
        }
    }

    /// Drains, flushes, and releases the output, then stops accepting records.
    /// Calling it again is a no-op.
    ///
    /// # Errors
    /// The final flush or close of the output failed.
    pub fn close(&self) -> Result<(), Error> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        internal::debug("DISPATCH", "Closing dispatcher");
        match &self.engine {
            Engine::Sync { output } => match output.lock().take() {
                Some(output) => {
                    let flushed = output.flush();
                    flushed.and(output.close())
                }
                None => Ok(()),
            },
            Engine::Async {
                records,
                control,
                consumer,
            } => {
                // Waits out producers blocked on a full queue; any record they got in
                // is ahead of the close signal.
                drop(records.write().take());
                let result = {
                    let _turn = self.handshake.lock();
                    handshake(control, ControlSignal::Close)
                };
                if let Some(handle) = consumer.lock().take()
                    && handle.join().is_err()
                {
                    internal::error("DISPATCH", "Consumer thread panicked");
                }
                result
            }
        }
    }
}

/// Sends `signal` and waits for the consumer's answer.
fn handshake(control: &flume::Sender<Control>, signal: ControlSignal) -> Result<(), Error> {
    let (request, answer) = Control::new(signal);
    control.send(request).map_err(|_| Error::Closed)?;
    answer.recv().map_err(|_| Error::Closed)?
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            internal::error("DISPATCH", &format!("Close on drop failed: {e}"));
        }
    }
}
