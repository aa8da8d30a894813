//! Sync and async dispatch: ordering, barriers, backpressure, and close.

use parking_lot::Mutex;
use rotlog::{DispatchMode, Dispatcher, Error, Level, LogRecord, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Recorder {
    lines: Mutex<Vec<String>>,
    delay: Duration,
    fail_on: Option<&'static str>,
    flushes: AtomicUsize,
    closed: AtomicBool,
}

impl Recorder {
    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Output for Recorder {
    fn write(&self, record: &LogRecord) -> Result<(), Error> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.fail_on == Some(record.text()) {
            return Err(Error::Io(std::io::Error::other("disk on fire")));
        }
        self.lines.lock().push(record.text().to_string());
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn rec(text: impl Into<String>) -> LogRecord {
    LogRecord::new(Level::Informational, text)
}

#[test]
fn capacity_selects_mode() {
    let sync = Dispatcher::new(Box::new(Arc::new(Recorder::default())), 0).unwrap();
    let queued = Dispatcher::new(Box::new(Arc::new(Recorder::default())), 8).unwrap();
    assert_eq!(sync.mode(), DispatchMode::Sync);
    assert_eq!(queued.mode(), DispatchMode::Async);
}

#[test]
fn async_preserves_submission_order() {
    let out = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 16).unwrap();

    for i in 0..1000 {
        dispatcher.submit(rec(i.to_string())).unwrap();
    }
    dispatcher.flush().unwrap();

    let expected: Vec<String> = (0..1000).map(|i: i32| i.to_string()).collect();
    assert_eq!(out.lines(), expected);
}

#[test]
fn multiple_producers_keep_their_own_order() {
    let out = Arc::new(Recorder::default());
    let dispatcher = Arc::new(Dispatcher::new(Box::new(Arc::clone(&out)), 8).unwrap());

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..250 {
                    dispatcher.submit(rec(format!("{p}:{i}"))).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    dispatcher.close().unwrap();

    let lines = out.lines();
    assert_eq!(lines.len(), 1000);
    for p in 0..4 {
        let seen: Vec<u32> = lines
            .iter()
            .filter_map(|l| l.strip_prefix(&format!("{p}:")))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(seen, (0..250).collect::<Vec<_>>(), "producer {p}");
    }
}

#[test]
fn flush_waits_for_queued_records() {
    let out = Recorder::slow(Duration::from_millis(1));
    let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 100).unwrap();

    for i in 0..50 {
        dispatcher.submit(rec(format!("{i}"))).unwrap();
    }
    dispatcher.flush().unwrap();

    assert_eq!(out.lines().len(), 50);
    assert_eq!(out.flushes.load(Ordering::SeqCst), 1);
}

#[test]
fn full_queue_blocks_instead_of_dropping() {
    let out = Recorder::slow(Duration::from_millis(20));
    let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 1).unwrap();

    let started = Instant::now();
    for i in 0..5 {
        dispatcher.submit(rec(format!("{i}"))).unwrap();
    }
    let elapsed = started.elapsed();
    dispatcher.close().unwrap();

    assert!(elapsed >= Duration::from_millis(30), "submit took {elapsed:?}");
    assert_eq!(out.lines(), vec!["0", "1", "2", "3", "4"]);
}

#[test]
fn close_drains_and_releases_output() {
    let out = Recorder::slow(Duration::from_millis(1));
    let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 200).unwrap();

    for i in 0..100 {
        dispatcher.submit(rec(format!("{i}"))).unwrap();
    }
    dispatcher.close().unwrap();

    assert_eq!(out.lines().len(), 100);
    assert!(out.closed.load(Ordering::SeqCst));
}

#[test]
fn close_is_idempotent_and_final() {
    for capacity in [0, 4] {
        let out = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), capacity).unwrap();
        dispatcher.submit(rec("before")).unwrap();

        dispatcher.close().unwrap();
        dispatcher.close().unwrap();

        assert!(dispatcher.is_closed());
        assert!(matches!(dispatcher.submit(rec("after")), Err(Error::Closed)));
        assert!(matches!(dispatcher.flush(), Err(Error::Closed)));
        assert_eq!(out.lines(), vec!["before"]);
        assert!(out.closed.load(Ordering::SeqCst));
    }
}

#[test]
fn async_write_error_surfaces_on_next_flush() {
    let out = Arc::new(Recorder {
        fail_on: Some("bad"),
        ..Recorder::default()
    });
    let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 8).unwrap();

    dispatcher.submit(rec("ok 1")).unwrap();
    dispatcher.submit(rec("bad")).unwrap();
    dispatcher.submit(rec("ok 2")).unwrap();

    assert!(matches!(dispatcher.flush(), Err(Error::Io(_))));
    dispatcher.flush().unwrap();
    assert_eq!(out.lines(), vec!["ok 1", "ok 2"]);
}

#[test]
fn sync_write_error_is_returned_to_caller() {
    let out = Arc::new(Recorder {
        fail_on: Some("bad"),
        ..Recorder::default()
    });
    let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 0).unwrap();

    dispatcher.submit(rec("ok")).unwrap();
    assert!(matches!(dispatcher.submit(rec("bad")), Err(Error::Io(_))));
    dispatcher.submit(rec("ok again")).unwrap();
    assert_eq!(out.lines(), vec!["ok", "ok again"]);
}

#[test]
fn concurrent_flushes_each_see_their_records() {
    let out = Recorder::slow(Duration::from_micros(200));
    let dispatcher = Arc::new(Dispatcher::new(Box::new(Arc::clone(&out)), 32).unwrap());

    let workers: Vec<_> = (0..4)
        .map(|t| {
            let dispatcher = Arc::clone(&dispatcher);
            let out = Arc::clone(&out);
            thread::spawn(move || {
                for i in 0..20 {
                    dispatcher.submit(rec(format!("{t}:{i}"))).unwrap();
                }
                dispatcher.flush().unwrap();
                let mine = out
                    .lines()
                    .iter()
                    .filter(|l| l.starts_with(&format!("{t}:")))
                    .count();
                assert_eq!(mine, 20);
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
}

#[test]
fn drop_closes_output() {
    let out = Arc::new(Recorder::default());
    {
        let dispatcher = Dispatcher::new(Box::new(Arc::clone(&out)), 4).unwrap();
        dispatcher.submit(rec("pending")).unwrap();
    }
    assert_eq!(out.lines(), vec!["pending"]);
    assert!(out.closed.load(Ordering::SeqCst));
}

#[test]
fn close_race_never_loses_accepted_records() {
    for _ in 0..100 {
        let out = Arc::new(Recorder::default());
        let dispatcher = Arc::new(Dispatcher::new(Box::new(Arc::clone(&out)), 4).unwrap());
        let accepted = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let dispatcher = Arc::clone(&dispatcher);
                let accepted = Arc::clone(&accepted);
                thread::spawn(move || {
                    let mut i = 0;
                    while dispatcher.submit(rec(format!("{p}-{i}"))).is_ok() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                        i += 1;
                    }
                })
            })
            .collect();

        thread::sleep(Duration::from_micros(300));
        dispatcher.close().unwrap();
        for producer in producers {
            producer.join().unwrap();
        }

        assert!(out.closed.load(Ordering::SeqCst));
        assert_eq!(out.lines().len(), accepted.load(Ordering::SeqCst));
    }
}
