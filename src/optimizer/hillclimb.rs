use super::actions::{classify, run_table};
use super::{starting_score, Probe};
use crate::consts::{ALPHABET_SIZE, DEFAULT_MAX_PLUGS, DEFAULT_MIN_PLUGS};
use crate::core_types::Letter;
use crate::machine::Plugboard;
use crate::scorer::Measure;

/// Pairwise plugboard hill-climb.
///
/// Below `min_plugs` placed plugs the board is scored with `early` and edits
/// that remove a plug are not considered; once `min_plugs` is reached `late`
/// takes over for the rest of the run. Boards with more than `max_plugs`
/// plugs are never scored.
#[derive(Debug, Clone)]
pub struct HillClimb {
    pub early: Measure,
    pub late: Measure,
    pub min_plugs: usize,
    pub max_plugs: usize,
}

/// Score of the current board, tagged with the measure it was taken in.
#[derive(Debug, Clone, Copy)]
pub struct Standing {
    pub score: f64,
    pub late: bool,
}

impl HillClimb {
    pub fn new(early: Measure, late: Measure) -> Self {
        Self {
            early,
            late,
            min_plugs: DEFAULT_MIN_PLUGS,
            max_plugs: DEFAULT_MAX_PLUGS,
        }
    }

    /// Same measure throughout, removals allowed from the start.
    pub fn single(measure: Measure) -> Self {
        Self {
            early: measure.clone(),
            late: measure,
            min_plugs: 0,
            max_plugs: DEFAULT_MAX_PLUGS,
        }
    }

    fn is_late(&self, plugs: usize) -> bool {
        plugs >= self.min_plugs
    }

    fn measure(&self, late: bool) -> &Measure {
        if late {
            &self.late
        } else {
            &self.early
        }
    }

    pub fn start(&self, pb: &Plugboard, probe: &mut Probe<'_>, prev: Option<(&Measure, f64)>) -> Standing {
        let late = self.is_late(pb.plug_count());
        Standing {
            score: starting_score(probe, self.measure(late), pb, prev),
            late,
        }
    }

    /// One pass over every letter pair. Returns whether any edit was kept.
    pub fn sweep(&self, pb: &mut Plugboard, probe: &mut Probe<'_>, standing: &mut Standing) -> bool {
        let mut improved = false;
        for i in 0..ALPHABET_SIZE as Letter {
            for k in (i + 1)..ALPHABET_SIZE as Letter {
                let plugs = pb.plug_count();
                // Once `late` has taken over it stays in charge, even if a
                // removal drops the board below `min_plugs` again.
                let late = standing.late || self.is_late(plugs);
                if late != standing.late {
                    standing.score = probe.score(self.measure(late), pb);
                    standing.late = late;
                }
                let Some((table, cells)) = classify(pb, i, k) else {
                    continue;
                };

                let measure = self.measure(late);
                let removals_allowed = late;
                let kept = run_table(table, cells, pb, standing.score, |board, delta| {
                    if delta < 0 && !removals_allowed {
                        return None;
                    }
                    if (plugs as i64 + delta as i64) as usize > self.max_plugs {
                        return None;
                    }
                    Some(probe.score(measure, board))
                });
                if let Some(score) = kept {
                    standing.score = score;
                    improved = true;
                }
            }
        }
        improved
    }

    /// Sweeps until nothing improves. The result is in the `late` measure.
    pub fn run(&self, pb: &mut Plugboard, probe: &mut Probe<'_>, prev: Option<(&Measure, f64)>) -> f64 {
        let mut standing = self.start(pb, probe, prev);
        while self.sweep(pb, probe, &mut standing) {}
        if standing.late || self.early.same_as(&self.late) {
            standing.score
        } else {
            probe.score(&self.late, pb)
        }
    }
}
