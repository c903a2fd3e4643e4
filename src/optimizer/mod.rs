//! Plugboard local search over a fixed scrambler.

pub mod actions;
pub mod hillclimb;
pub mod reswap;

pub use self::actions::PlugOp;
pub use self::hillclimb::HillClimb;
pub use self::reswap::Reswap;

use crate::core_types::Letter;
use crate::machine::{Plugboard, Scrambler};
use crate::scorer::{Evaluator, Measure};

/// Everything needed to score a plugboard against one mechanical key.
pub struct Probe<'a> {
    pub scrambler: &'a Scrambler,
    pub ciphertext: &'a [Letter],
    pub evaluator: &'a mut Evaluator,
}

impl<'a> Probe<'a> {
    pub fn new(scrambler: &'a Scrambler, ciphertext: &'a [Letter], evaluator: &'a mut Evaluator) -> Self {
        Self {
            scrambler,
            ciphertext,
            evaluator,
        }
    }

    #[inline]
    pub fn score(&mut self, measure: &Measure, pb: &Plugboard) -> f64 {
        self.evaluator
            .score(measure, self.scrambler, pb, self.ciphertext)
    }
}

/// Reuses `prev` when it was measured with `measure`, otherwise rescores.
pub(crate) fn starting_score(
    probe: &mut Probe<'_>,
    measure: &Measure,
    pb: &Plugboard,
    prev: Option<(&Measure, f64)>,
) -> f64 {
    match prev {
        Some((m, score)) if m.same_as(measure) => score,
        _ => probe.score(measure, pb),
    }
}
