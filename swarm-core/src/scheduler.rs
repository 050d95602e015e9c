//! Periodic task scheduling, decoupled from any particular host timer.
//!
//! A [`Scheduler`] runs a task repeatedly at a fixed interval and hands back
//! a [`TaskHandle`]. Cancelling (or dropping) the handle guarantees the task
//! never runs again once the call returns.
//!
//! Two implementations are provided:
//! - [`ThreadScheduler`] - one OS thread per task, sleeping until each
//!   deadline.
//! - [`ManualScheduler`] - host-driven; tasks only run inside
//!   [`Scheduler::advance`]. Useful as a fake timer and for frame-driven
//!   hosts.

use log::warn;
use parking_lot::Mutex;
use std::{
    fmt,
    sync::{Arc, Weak, mpsc},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// Shortest interval a scheduler will honour.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a scheduled repeating task.
///
/// Implementations must also cancel on drop.
pub trait TaskHandle {
    /// Stops the task. No run of the task starts after this returns.
    fn cancel(self);
}

/// Something that can run a task at a fixed interval.
pub trait Scheduler {
    type Handle: TaskHandle;

    /// Runs `task` every `interval` until the returned handle is cancelled.
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    fn schedule_repeating<F>(&mut self, interval: Duration, task: F) -> Self::Handle
    where
        F: FnMut() + Send + 'static;

    /// Lets the host report elapsed time. Free-running schedulers ignore it.
    fn advance(&mut self, _elapsed: Duration) {}
}

/// Runs every task on its own background thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadScheduler;

/// Handle for a task running on a [`ThreadScheduler`] thread.
#[derive(Debug)]
pub struct ThreadTask {
    stop: Option<mpsc::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadTask {
    fn shutdown(&mut self) {
        // Dropping the sender wakes the worker out of its wait.
        drop(self.stop.take());

        let Some(worker) = self.worker.take() else {
            return;
        };
        // A task cancelling itself cannot wait for its own thread.
        if worker.thread().id() == thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            warn!("scheduled task panicked");
        }
    }
}

impl TaskHandle for ThreadTask {
    fn cancel(mut self) {
        self.shutdown();
    }
}

impl Drop for ThreadTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Scheduler for ThreadScheduler {
    type Handle = ThreadTask;

    fn schedule_repeating<F>(&mut self, interval: Duration, mut task: F) -> ThreadTask
    where
        F: FnMut() + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        task();
                        deadline += interval;
                        // Drop missed frames instead of replaying them in a burst.
                        let now = Instant::now();
                        if deadline < now {
                            deadline = now + interval;
                        }
                    }
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        ThreadTask {
            stop: Some(stop_tx),
            worker: Some(worker),
        }
    }
}

type BoxedTask = Box<dyn FnMut() + Send>;

struct ManualEntry {
    key: u64,
    interval: Duration,
    elapsed: Duration,
    task: BoxedTask,
}

#[derive(Default)]
struct ManualState {
    next_key: u64,
    entries: Vec<ManualEntry>,
}

/// A scheduler whose clock only moves when the host calls
/// [`Scheduler::advance`].
///
/// Due repetitions run synchronously inside `advance`, in scheduling order.
/// Tasks must not schedule or cancel on the same scheduler from inside their
/// body. Clones share the same task list.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks currently scheduled.
    pub fn pending(&self) -> usize {
        self.state.lock().entries.len()
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Handle for a task on a [`ManualScheduler`].
#[derive(Debug)]
pub struct ManualTask {
    key: u64,
    state: Weak<Mutex<ManualState>>,
}

impl ManualTask {
    fn remove(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.lock().entries.retain(|e| e.key != self.key);
        }
        self.state = Weak::new();
    }
}

impl TaskHandle for ManualTask {
    fn cancel(mut self) {
        self.remove();
    }
}

impl Drop for ManualTask {
    fn drop(&mut self) {
        self.remove();
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTask;

    fn schedule_repeating<F>(&mut self, interval: Duration, task: F) -> ManualTask
    where
        F: FnMut() + Send + 'static,
    {
        let mut state = self.state.lock();
        let key = state.next_key;
        state.next_key += 1;
        state.entries.push(ManualEntry {
            key,
            interval: interval.max(MIN_INTERVAL),
            elapsed: Duration::ZERO,
            task: Box::new(task),
        });

        ManualTask {
            key,
            state: Arc::downgrade(&self.state),
        }
    }

    fn advance(&mut self, elapsed: Duration) {
        let mut state = self.state.lock();
        for entry in state.entries.iter_mut() {
            entry.elapsed += elapsed;
            while entry.elapsed >= entry.interval {
                entry.elapsed -= entry.interval;
                (entry.task)();
            }
        }
    }
}
