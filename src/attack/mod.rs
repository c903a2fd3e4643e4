//! Multi-worker search over a key space.

pub mod passes;
pub mod progress;
pub mod runner;

pub use self::passes::{run_passes, Pass};
pub use self::progress::Progress;
pub use self::runner::run_attack;

use crate::consts::{DEFAULT_BATCH_SIZE, DEFAULT_HOLD_SIZE};
use crate::core_types::Message;
use crate::error::{RfResult, RotorForgeError};
use crate::hold::Hold;
use crate::keyspace::KeySpace;
use crate::machine::Key;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const POLL_TICK: Duration = Duration::from_millis(20);

/// Shared stop flag. Workers look at it between keys.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A trait for receiving updates during an attack.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, progress: &Progress, hold: &Hold<Key>) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(&Progress, &Hold<Key>) -> bool + Send + Sync,
{
    fn on_progress(&self, progress: &Progress, hold: &Hold<Key>) -> bool {
        self(progress, hold)
    }
}

#[derive(Debug, Clone)]
pub struct AttackOptions {
    pub workers: usize,
    pub hold_size: usize,
    pub batch_size: u64,
    pub report_interval: Duration,
}

impl Default for AttackOptions {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            hold_size: DEFAULT_HOLD_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            report_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttackSummary {
    pub progress: Progress,
    pub workers: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// One query: a key space, its pass pipeline and the hold the workers share.
pub struct Attack {
    pub space: KeySpace,
    pub passes: Vec<Pass>,
    pub ciphertext: Message,
    pub hold: Hold<Key>,
    pub options: AttackOptions,
}

impl Attack {
    pub fn new(space: KeySpace, passes: Vec<Pass>, ciphertext: Message, options: AttackOptions) -> RfResult<Self> {
        if passes.is_empty() {
            return Err(RotorForgeError::Config("At least one pass is required".into()));
        }
        if ciphertext.is_empty() {
            return Err(RotorForgeError::Config("Ciphertext is empty".into()));
        }
        let hold = Hold::new(options.hold_size)?;
        Ok(Self {
            space,
            passes,
            ciphertext,
            hold,
            options,
        })
    }

    /// Runs all workers to completion or cancellation.
    ///
    /// If a worker cannot be started, the token is cancelled and the workers
    /// already running are joined before the error is returned.
    pub fn run<CB: ProgressCallback>(&self, cancel: &CancelToken, callback: &CB) -> RfResult<AttackSummary> {
        let slices = self.space.slice(self.options.workers.max(1));
        let records: Vec<Mutex<Progress>> = slices
            .iter()
            .map(|s| Mutex::new(Progress::new(self.options.batch_size, s.count())))
            .collect();
        let combined = || {
            let snapshot: Vec<Progress> = records
                .iter()
                .map(|r| r.lock().unwrap_or_else(|e| e.into_inner()).clone())
                .collect();
            Progress::combine(&snapshot)
        };

        info!(
            keys = self.space.count(),
            workers = slices.len(),
            passes = %self.passes.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", "),
            "Starting attack"
        );
        let started = Instant::now();

        let outcome = thread::scope(|scope| -> RfResult<()> {
            let mut handles = Vec::with_capacity(slices.len());
            let mut failure = None;

            for (i, (slice, record)) in slices.iter().zip(&records).enumerate() {
                let spawned = thread::Builder::new()
                    .name(format!("worker-{}", i))
                    .spawn_scoped(scope, move || {
                        run_attack(slice, &self.passes, &self.ciphertext, &self.hold, record, cancel)
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        cancel.cancel();
                        failure = Some(RotorForgeError::Worker(format!(
                            "Could not start worker {}: {}",
                            i, e
                        )));
                        break;
                    }
                }
            }

            let mut last_report = Instant::now();
            while failure.is_none() && !handles.iter().all(|h| h.is_finished()) {
                thread::sleep(POLL_TICK.min(self.options.report_interval));
                if last_report.elapsed() >= self.options.report_interval {
                    last_report = Instant::now();
                    if !callback.on_progress(&combined(), &self.hold) && !cancel.is_cancelled() {
                        warn!("Progress callback requested cancellation");
                        cancel.cancel();
                    }
                }
            }

            let mut result = failure.map_or(Ok(()), Err);
            for handle in handles {
                let joined = match handle.join() {
                    Ok(r) => r,
                    Err(_) => Err(RotorForgeError::Worker("Worker thread panicked".into())),
                };
                if let Err(e) = joined {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
            }
            result
        });

        let progress = combined();
        callback.on_progress(&progress, &self.hold);
        outcome?;

        let summary = AttackSummary {
            progress,
            workers: slices.len(),
            cancelled: cancel.is_cancelled(),
            elapsed: started.elapsed(),
        };
        info!(
            keys = summary.progress.completed_units,
            decrypts = summary.progress.decrypts,
            elapsed = ?summary.elapsed,
            cancelled = summary.cancelled,
            "Attack finished"
        );
        Ok(summary)
    }
}
