use crate::consts::DEFAULT_BATCH_SIZE;

/// Work counters of one worker, or of all workers combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    /// Keys scored between two publications.
    pub batch_size: u64,
    pub total_units: u64,
    pub completed_units: u64,
    pub decrypts: u64,
    /// Seconds since the worker started.
    pub elapsed: f64,
    /// Seconds spent on the last published batch.
    pub last_batch: f64,
}

impl Progress {
    pub fn new(batch_size: u64, total_units: u64) -> Self {
        Self {
            batch_size: if batch_size == 0 {
                DEFAULT_BATCH_SIZE
            } else {
                batch_size
            },
            total_units,
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_units >= self.total_units
    }

    /// `(percent done, elapsed seconds, estimated seconds left)`.
    /// The estimate is `None` until some work has completed.
    pub fn snapshot(&self) -> (f64, f64, Option<f64>) {
        let percent = if self.total_units == 0 {
            100.0
        } else {
            100.0 * self.completed_units as f64 / self.total_units as f64
        };
        let eta = (self.completed_units > 0).then(|| {
            let left = self.total_units.saturating_sub(self.completed_units) as f64;
            self.elapsed * left / self.completed_units as f64
        });
        (percent, self.elapsed, eta)
    }

    /// Sums counters; times are taken as the slowest worker's.
    pub fn combine<'a>(records: impl IntoIterator<Item = &'a Progress>) -> Progress {
        records.into_iter().fold(Progress::default(), |mut acc, p| {
            acc.batch_size = acc.batch_size.max(p.batch_size);
            acc.total_units += p.total_units;
            acc.completed_units += p.completed_units;
            acc.decrypts += p.decrypts;
            acc.elapsed = acc.elapsed.max(p.elapsed);
            acc.last_batch = acc.last_batch.max(p.last_batch);
            acc
        })
    }

    /// Keys scored per second so far.
    pub fn rate(&self) -> f64 {
        if self.elapsed > 0.0 {
            self.completed_units as f64 / self.elapsed
        } else {
            0.0
        }
    }
}
