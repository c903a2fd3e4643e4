use crate::machine::Plugboard;
use crate::optimizer::{starting_score, HillClimb, Probe, Reswap};
use crate::scorer::Measure;
use std::fmt;

/// One stage of the per-key pipeline.
#[derive(Debug, Clone)]
pub enum Pass {
    /// Score the board as it stands.
    Measure(Measure),
    HillClimb(HillClimb),
    Reswap(Reswap),
}

impl Pass {
    /// Measure the score returned by [`Pass::run`] is expressed in.
    pub fn result_measure(&self) -> &Measure {
        match self {
            Pass::Measure(m) => m,
            Pass::HillClimb(h) => &h.late,
            Pass::Reswap(r) => &r.measure,
        }
    }

    pub fn run(&self, pb: &mut Plugboard, probe: &mut Probe<'_>, prev: Option<(&Measure, f64)>) -> f64 {
        match self {
            Pass::Measure(m) => starting_score(probe, m, pb, prev),
            Pass::HillClimb(h) => h.run(pb, probe, prev),
            Pass::Reswap(r) => r.run(pb, probe, prev),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Measure(m) => write!(f, "measure[{}]", m),
            Pass::HillClimb(h) => write!(
                f,
                "hill_climb[{} -> {} @ {}..{}]",
                h.early, h.late, h.min_plugs, h.max_plugs
            ),
            Pass::Reswap(r) => write!(f, "reswap[{}]", r.measure),
        }
    }
}

/// Runs `passes` in order, each seeded with the previous score, and returns the last score.
pub fn run_passes(passes: &[Pass], pb: &mut Plugboard, probe: &mut Probe<'_>) -> f64 {
    let mut prev: Option<(&Measure, f64)> = None;
    let mut score = f64::NEG_INFINITY;
    for pass in passes {
        score = pass.run(pb, probe, prev);
        prev = Some((pass.result_measure(), score));
    }
    score
}
