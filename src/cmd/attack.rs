use crate::reports;
use clap::Args;
use rotorforge::api::prepare_attack;
use rotorforge::attack::{CancelToken, Progress, ProgressCallback};
use rotorforge::config::RunParams;
use rotorforge::error::RfResult;
use rotorforge::hold::Hold;
use rotorforge::machine::Key;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct AttackArgs {
    /// Query file (JSON)
    #[arg(short, long)]
    pub query: PathBuf,

    #[command(flatten)]
    pub params: RunParams,

    /// Entries shown in the final table
    #[arg(long, default_value_t = 10)]
    pub show: usize,
}

struct CliLogger {
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl ProgressCallback for CliLogger {
    fn on_progress(&self, progress: &Progress, hold: &Hold<Key>) -> bool {
        let (percent, elapsed, eta) = progress.snapshot();
        let best = hold.scores().first().copied().unwrap_or(f64::NEG_INFINITY);
        match eta {
            Some(eta) => info!(
                "{:6.2}% | {:.0}s elapsed, {:.0}s left | {:.0} keys/s | best {:.4}",
                percent,
                elapsed,
                eta,
                progress.rate(),
                best
            ),
            None => info!("{:6.2}% | {:.0}s elapsed | best {:.4}", percent, elapsed, best),
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline && !self.cancel.is_cancelled() {
                warn!("Time limit reached, stopping");
                return false;
            }
        }
        true
    }
}

pub fn run(args: AttackArgs) -> RfResult<()> {
    info!("Loading query: {}", args.query.display());
    let attack = prepare_attack(&args.query, &args.params)?;

    info!(
        "{} keys to search ({} in total) with {} workers",
        attack.space.count(),
        attack.space.total(),
        attack.options.workers
    );

    let cancel = CancelToken::new();
    let logger = CliLogger {
        deadline: args.params.time.map(|t| Instant::now() + Duration::from_secs(t)),
        cancel: cancel.clone(),
    };
    let summary = attack.run(&cancel, &logger)?;

    if summary.cancelled {
        warn!(
            "Stopped after {} of {} keys",
            summary.progress.completed_units, summary.progress.total_units
        );
    }
    reports::print_summary(&summary);
    reports::print_hold(&attack.hold.snapshot(args.show));
    Ok(())
}
