//! Typed handshake between callers and the consumer thread.

use crate::Error;

/// What the consumer should do after draining the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Drain, flush the output, keep running.
    Flush,
    /// Drain, flush, release the output, exit.
    Close,
}

/// A signal plus the slot the consumer answers on.
#[derive(Debug)]
pub(super) struct Control {
    pub signal: ControlSignal,
    pub reply: flume::Sender<Result<(), Error>>,
}

impl Control {
    pub fn new(signal: ControlSignal) -> (Self, flume::Receiver<Result<(), Error>>) {
        let (reply, answer) = flume::bounded(1);
        (Self { signal, reply }, answer)
    }
}
