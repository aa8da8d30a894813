//! The single consumer that drains the async queue into the output.

use super::control::{Control, ControlSignal};
use crate::output::{LogRecord, Output};
use crate::{Error, internal};

enum Event {
    Record(Result<LogRecord, flume::RecvError>),
    Control(Result<Control, flume::RecvError>),
}

/// Consumer loop. Owns the output until a `Close` signal (or the control sender going
/// away) ends it. The record queue disconnecting alone does not end it.
pub(super) fn run(
    output: Box<dyn Output>,
    records: flume::Receiver<LogRecord>,
    control: flume::Receiver<Control>,
) {
    let mut worker = Worker {
        output,
        records,
        failed_write: None,
    };

    let mut records_open = true;
    loop {
        let event = if records_open {
            flume::Selector::new()
                .recv(&worker.records, Event::Record)
                .recv(&control, Event::Control)
                .wait()
        } else {
            Event::Control(control.recv())
        };

        match event {
            Event::Record(Ok(record)) => worker.write(&record),
            // Producers are cut off; `close` is about to send its signal
            Event::Record(Err(_)) => records_open = false,
            Event::Control(Ok(Control { signal, reply })) => {
                worker.drain();
                match signal {
                    ControlSignal::Flush => {
                        let _ = reply.send(worker.flush());
                    }
                    ControlSignal::Close => {
                        let result = worker.shutdown();
                        let _ = reply.send(result);
                        return;
                    }
                }
            }
            // The dispatcher went away without closing us
            Event::Control(Err(_)) => {
                worker.drain();
                if let Err(e) = worker.shutdown() {
                    internal::error("DISPATCH", &format!("Shutdown without close: {e}"));
                }
                return;
            }
        }
    }
}

struct Worker {
    output: Box<dyn Output>,
    records: flume::Receiver<LogRecord>,
    /// First write failure since the last flush, handed to the next flush caller.
    failed_write: Option<Error>,
}

impl Worker {
    fn write(&mut self, record: &LogRecord) {
        if let Err(e) = self.output.write(record) {
            internal::error("DISPATCH", &format!("Unable to write record: {e}"));
            self.failed_write.get_or_insert(e);
        }
    }

    /// Writes everything already queued, in order.
    fn drain(&mut self) {
        while let Ok(record) = self.records.try_recv() {
            self.write(&record);
        }
    }

    fn flush(&mut self) -> Result<(), Error> {
        let flushed = self.output.flush();
        match self.failed_write.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }

    fn shutdown(&mut self) -> Result<(), Error> {
        let flushed = self.flush();
        let closed = self.output.close();
        flushed.and(closed)
    }
}
