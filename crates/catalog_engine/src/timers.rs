use std::cell::{Cell, RefCell};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::engine_warn;

/// Fire-and-forget one-shot timers. Scheduling never blocks and a scheduled
/// task cannot be cancelled; consumers ignore tasks that no longer apply.
pub trait Scheduler<T> {
    /// Queue `task` to fire after `delay`. A task that cannot be queued is
    /// handed back so the caller can run it another way.
    fn schedule(&self, delay: Duration, task: T) -> Result<(), Unscheduled<T>>;
}

/// A task the scheduler could not queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unscheduled<T> {
    pub delay: Duration,
    pub task: T,
}

enum TimerCommand<T> {
    Schedule { delay: Duration, task: T },
}

/// Real-time timers: a background thread owns a tokio runtime and each task
/// sleeps there before being posted back to the owner of the handle.
pub struct TimerHandle<T> {
    cmd_tx: mpsc::Sender<TimerCommand<T>>,
    fired_rx: mpsc::Receiver<T>,
    pending: Arc<AtomicUsize>,
}

impl<T: Send + 'static> TimerHandle<T> {
    pub fn new() -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<TimerCommand<T>>();
        let (fired_tx, fired_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let fired_tx = fired_tx.clone();
                match command {
                    TimerCommand::Schedule { delay, task } => {
                        runtime.spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = fired_tx.send(task);
                        });
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            fired_rx,
            pending: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn try_recv(&self) -> Option<T> {
        let task = self.fired_rx.try_recv().ok()?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(task)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        let task = self.fired_rx.recv_timeout(timeout).ok()?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(task)
    }

    /// Tasks scheduled but not yet received.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl<T: Send + 'static> Scheduler<T> for TimerHandle<T> {
    fn schedule(&self, delay: Duration, task: T) -> Result<(), Unscheduled<T>> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.cmd_tx
            .send(TimerCommand::Schedule { delay, task })
            .map_err(|mpsc::SendError(command)| {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                engine_warn!("Timer thread is gone; task due in {:?} not queued", delay);
                let TimerCommand::Schedule { delay, task } = command;
                Unscheduled { delay, task }
            })
    }
}

struct Scheduled<T> {
    due: Duration,
    seq: u64,
    task: T,
}

/// Virtual-clock timers for tests and deterministic replays. Time only moves
/// when the owner pops tasks or sets the clock.
pub struct ManualScheduler<T> {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<Vec<Scheduled<T>>>,
}

impl<T> Default for ManualScheduler<T> {
    fn default() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            next_seq: Cell::new(0),
            queue: RefCell::new(Vec::new()),
        }
    }
}

impl<T> ManualScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.borrow().iter().map(|entry| entry.due).min()
    }

    /// Remove the earliest task due at or before `until` (ties in scheduling
    /// order) and move the clock to its due time.
    pub fn pop_due(&self, until: Duration) -> Option<T> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)?;
        let entry = queue.remove(index);
        if entry.due > self.now.get() {
            self.now.set(entry.due);
        }
        Some(entry.task)
    }

    /// Move the clock forward to `until`; never backwards.
    pub fn settle(&self, until: Duration) {
        if until > self.now.get() {
            self.now.set(until);
        }
    }
}

impl<T> Scheduler<T> for ManualScheduler<T> {
    fn schedule(&self, delay: Duration, task: T) -> Result<(), Unscheduled<T>> {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(Scheduled {
            due: self.now.get() + delay,
            seq,
            task,
        });
        Ok(())
    }
}
