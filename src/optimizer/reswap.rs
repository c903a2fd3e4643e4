use super::{starting_score, Probe};
use crate::consts::ALPHABET_SIZE;
use crate::core_types::Letter;
use crate::machine::Plugboard;
use crate::scorer::Measure;

/// Moves one end of an existing plug to a free letter.
/// Each sweep applies the single best such move found.
#[derive(Debug, Clone)]
pub struct Reswap {
    pub measure: Measure,
}

#[derive(Debug, Clone, Copy)]
struct Move {
    score: f64,
    unplug: Letter,
    from: Letter,
    to: Letter,
}

impl Reswap {
    pub fn new(measure: Measure) -> Self {
        Self { measure }
    }

    fn best_move(&self, pb: &mut Plugboard, probe: &mut Probe<'_>, current: f64) -> Option<Move> {
        let mut best: Option<Move> = None;
        for (i, k) in pb.pairs() {
            pb.unplug(i);
            for x in 0..ALPHABET_SIZE as Letter {
                if x == i || x == k || !pb.is_free(x) {
                    continue;
                }
                for end in [i, k] {
                    pb.plug(end, x);
                    let score = probe.score(&self.measure, pb);
                    pb.unplug(end);
                    let threshold = best.map(|m| m.score).unwrap_or(current);
                    if score > threshold {
                        best = Some(Move {
                            score,
                            unplug: i,
                            from: end,
                            to: x,
                        });
                    }
                }
            }
            pb.plug(i, k);
        }
        best
    }

    pub fn run(&self, pb: &mut Plugboard, probe: &mut Probe<'_>, prev: Option<(&Measure, f64)>) -> f64 {
        let mut current = starting_score(probe, &self.measure, pb, prev);
        while let Some(m) = self.best_move(pb, probe, current) {
            pb.unplug(m.unplug);
            pb.plug(m.from, m.to);
            current = m.score;
        }
        current
    }
}
