//! Deferred hide of the "task added" banner.
//!
//! # Responsibility
//! - Run delayed jobs through a pluggable `Scheduler`.
//! - Decide, per `BannerPolicy`, whether a fired hide still applies.
//!
//! # Invariants
//! - Scheduling never blocks the caller.
//! - `ThreadScheduler` uses exactly one timer thread, however many jobs.
//! - Under `Debounce`, only the job carrying the latest token may hide.
//! - `ManualScheduler` fires jobs in (due time, scheduling order).

use crate::config::BannerPolicy;
use log::{debug, error};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Deferred unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs after a delay. Fire-and-forget: jobs cannot be joined.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, job: Job);
}

const TIMER_THREAD_NAME: &str = "tasklist-banner-timer";

/// Scheduler backed by one named timer thread per instance.
///
/// Jobs travel over a channel and run on that thread in due order, so a
/// burst of adds costs queue entries rather than threads. After the
/// scheduler is dropped the thread drains what is queued and exits.
pub struct ThreadScheduler {
    sender: mpsc::Sender<(Instant, Job)>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(TIMER_THREAD_NAME.to_string())
            .spawn(move || run_timer_loop(receiver));
        if let Err(err) = spawned {
            error!("event=timer_spawn module=banner status=error error={err}");
        }
        Self { sender }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, job: Job) {
        if self.sender.send((Instant::now() + delay, job)).is_err() {
            error!("event=timer_schedule module=banner status=error reason=timer_thread_gone");
        }
    }
}

fn run_timer_loop(receiver: mpsc::Receiver<(Instant, Job)>) {
    let mut pending: BTreeMap<(Instant, u64), Job> = BTreeMap::new();
    let mut next_seq = 0_u64;
    let mut open = true;
    loop {
        let next_due = pending.keys().next().map(|(due, _)| *due);
        if open {
            let received = match next_due {
                Some(due) => receiver.recv_timeout(due.saturating_duration_since(Instant::now())),
                None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((due, job)) => {
                    pending.insert((due, next_seq), job);
                    next_seq += 1;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => open = false,
            }
        } else {
            match next_due {
                Some(due) => thread::sleep(due.saturating_duration_since(Instant::now())),
                None => return,
            }
        }

        let now = Instant::now();
        while let Some(entry) = pending.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let job = entry.remove();
            job();
        }
    }
}

struct PendingJob {
    due: Duration,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingJob>,
}

/// Virtual-time scheduler driven by explicit `advance` calls.
///
/// Hosts that own their event loop, and tests, use this instead of threads.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<ManualQueue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Moves virtual time forward by `by`, firing every job that falls due.
    ///
    /// Jobs scheduled by fired jobs also run if they fall due within the
    /// window. Returns the number of jobs fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut fired = 0;
        loop {
            let next = {
                let mut queue = self.lock();
                let earliest = queue
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.seq))
                    .map(|(index, _)| index);
                match earliest {
                    Some(index) => {
                        let pending = queue.pending.swap_remove(index);
                        queue.now = pending.due;
                        Some(pending.job)
                    }
                    None => {
                        queue.now = target;
                        None
                    }
                }
            };
            // Run outside the lock; jobs may schedule more jobs.
            match next {
                Some(job) => {
                    job();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, job: Job) {
        let mut queue = self.lock();
        let due = queue.now + delay;
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.pending.push(PendingJob { due, seq, job });
    }
}

/// Generation-token bookkeeping for the "task added" banner.
#[derive(Debug)]
pub struct BannerTimer {
    policy: BannerPolicy,
    delay: Duration,
    generation: AtomicU64,
}

impl BannerTimer {
    pub fn new(policy: BannerPolicy, delay: Duration) -> Self {
        Self {
            policy,
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts a new banner window and returns its token.
    ///
    /// Arming supersedes every earlier token under `Debounce`.
    pub fn arm(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a hide job carrying `token` should still hide the banner.
    pub fn should_hide(&self, token: u64) -> bool {
        match self.policy {
            BannerPolicy::Legacy => true,
            BannerPolicy::Debounce => {
                let current = self.generation.load(Ordering::SeqCst);
                if current != token {
                    debug!(
                        "event=banner_hide module=banner status=ignored reason=superseded token={token} current={current}"
                    );
                    return false;
                }
                true
            }
        }
    }
}
