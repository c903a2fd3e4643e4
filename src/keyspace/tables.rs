//! Precomputed enumeration tables for a key space.
//!
//! Two slot states `(ring, pos)` and `(ring + a - b, pos + a)` encrypt alike
//! whenever `a` maps the turnover set onto itself (or the turnover is never
//! consulted) and `b` is a period of the wiring: the wiring offset
//! `pos - ring` only moves by a wiring period and every notch check sees the
//! same answer. Only the lexicographically smallest member of each class is
//! visited.

use super::descriptor::{KeySpaceDescriptor, SlotSpec};
use crate::consts::ALPHABET_SIZE;
use crate::core_types::{shift, Letter, LetterMask};
use crate::error::{RfResult, RotorForgeError};
use crate::machine::{Mechanism, Plugboard, Wheel};
use rayon::prelude::*;
use tracing::debug;

/// Canonical `(ring, position)` states of one wheel in one slot.
#[derive(Debug, Clone)]
pub struct WheelStates {
    canonical: [LetterMask; ALPHABET_SIZE],
    counts: [u64; ALPHABET_SIZE],
    live_rings: LetterMask,
    total: u64,
}

impl WheelStates {
    pub fn build(
        wheel: &Wheel,
        rings: LetterMask,
        positions: LetterMask,
        turnover_relevant: bool,
    ) -> Self {
        let a_step = if turnover_relevant {
            wheel.turnover_period()
        } else {
            1
        };
        let b_step = wheel.wiring_period();

        let mut seen = [[false; ALPHABET_SIZE]; ALPHABET_SIZE];
        let mut canonical = [LetterMask::EMPTY; ALPHABET_SIZE];
        let mut counts = [0u64; ALPHABET_SIZE];
        let mut live_rings = LetterMask::EMPTY;

        for r in rings.iter() {
            for p in positions.iter() {
                if seen[r as usize][p as usize] {
                    continue;
                }
                canonical[r as usize].insert(p);
                counts[r as usize] += 1;
                live_rings.insert(r);
                for a in (0..ALPHABET_SIZE as i32).step_by(a_step as usize) {
                    for b in (0..ALPHABET_SIZE as i32).step_by(b_step as usize) {
                        let r2 = shift(r, a - b);
                        let p2 = shift(p, a);
                        seen[r2 as usize][p2 as usize] = true;
                    }
                }
            }
        }

        let total = counts.iter().sum();
        Self {
            canonical,
            counts,
            live_rings,
            total,
        }
    }

    #[inline]
    pub fn positions(&self, ring: Letter) -> LetterMask {
        self.canonical[ring as usize]
    }

    #[inline]
    pub fn count(&self, ring: Letter) -> u64 {
        self.counts[ring as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn live_rings(&self) -> LetterMask {
        self.live_rings
    }

    pub fn first_ring(&self) -> Letter {
        self.live_rings.first().unwrap_or(0)
    }

    pub fn first_position(&self, ring: Letter) -> Letter {
        self.canonical[ring as usize].first().unwrap_or(0)
    }
}

/// Slots whose turnover notches are ever read by the stepping logic.
pub fn turnover_relevance(mechanism: Mechanism, rotating: &[bool]) -> Vec<bool> {
    let mut relevant = vec![false; rotating.len()];
    let Some(fast) = rotating.iter().rposition(|&r| r) else {
        return relevant;
    };
    match mechanism {
        Mechanism::Stepping => {
            if fast > 0 && rotating[fast - 1] {
                relevant[fast] = true;
                relevant[fast - 1] = true;
            }
        }
        Mechanism::Odometer => {
            let mut s = fast;
            while s > 0 && rotating[s - 1] {
                relevant[s] = true;
                s -= 1;
            }
        }
    }
    relevant
}

/// Wheel assignments in enumeration order (rightmost slot fastest),
/// skipping those that mount the same wheel twice.
fn enumerate_assignments(slots: &[SlotSpec]) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut digits = vec![0usize; slots.len()];
    loop {
        let distinct = (0..digits.len()).all(|i| {
            (i + 1..digits.len())
                .all(|j| slots[i].wheels[digits[i]].name != slots[j].wheels[digits[j]].name)
        });
        if distinct {
            out.push(digits.clone());
        }

        let mut s = digits.len();
        loop {
            if s == 0 {
                return out;
            }
            s -= 1;
            digits[s] += 1;
            if digits[s] < slots[s].wheels.len() {
                break;
            }
            digits[s] = 0;
        }
    }
}

/// Identity first, then every single cable over the plug mask in order.
fn plug_starts(plugs: LetterMask) -> Vec<Plugboard> {
    let letters: Vec<Letter> = plugs.iter().collect();
    let mut out = vec![Plugboard::identity()];
    for (n, &i) in letters.iter().enumerate() {
        for &k in &letters[n + 1..] {
            out.push(Plugboard::with_pair(i, k));
        }
    }
    out
}

/// Everything needed to decode a key index into a key.
#[derive(Debug)]
pub struct KeySpaceShape {
    pub mechanism: Mechanism,
    pub slots: Vec<SlotSpec>,
    /// `[slot][candidate]`
    pub states: Vec<Vec<WheelStates>>,
    pub assignments: Vec<Vec<usize>>,
    /// Prefix sums of per-assignment key counts, plug starts included.
    pub cumulative: Vec<u64>,
    pub plug_starts: Vec<Plugboard>,
    pub total: u64,
}

impl KeySpaceShape {
    pub fn build(desc: &KeySpaceDescriptor) -> RfResult<Self> {
        desc.validate()?;

        let rotating: Vec<bool> = desc.slots.iter().map(|s| s.effective_rotating()).collect();
        let relevant = turnover_relevance(desc.mechanism, &rotating);

        let states: Vec<Vec<WheelStates>> = desc
            .slots
            .iter()
            .zip(&relevant)
            .map(|(slot, &rel)| {
                slot.wheels
                    .iter()
                    .map(|w| WheelStates::build(w, slot.rings, slot.positions, rel))
                    .collect()
            })
            .collect();

        let assignments = enumerate_assignments(&desc.slots);
        let plug_starts = plug_starts(desc.plugs);
        let plug_factor = plug_starts.len() as u64;

        let weights: Vec<Option<u64>> = assignments
            .par_iter()
            .map(|assign| {
                assign
                    .iter()
                    .enumerate()
                    .try_fold(plug_factor, |acc, (s, &c)| {
                        acc.checked_mul(states[s][c].total())
                    })
            })
            .collect();

        let mut cumulative = Vec::with_capacity(weights.len() + 1);
        cumulative.push(0u64);
        let mut total = 0u64;
        for w in weights {
            total = w
                .and_then(|w| total.checked_add(w))
                .ok_or_else(|| {
                    RotorForgeError::Config("Key space is too large to enumerate".into())
                })?;
            cumulative.push(total);
        }

        debug!(
            assignments = assignments.len(),
            plug_starts = plug_factor,
            total,
            "Built key space tables"
        );

        Ok(Self {
            mechanism: desc.mechanism,
            slots: desc.slots.clone(),
            states,
            assignments,
            cumulative,
            plug_starts,
            total,
        })
    }

    #[inline]
    pub fn wheel_states(&self, assignment: usize, slot: usize) -> &WheelStates {
        &self.states[slot][self.assignments[assignment][slot]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::KnownWheel;

    #[test]
    fn test_relevance() {
        let rot = [false, true, true, true, false];
        assert_eq!(
            turnover_relevance(Mechanism::Stepping, &rot),
            vec![false, false, true, true, false]
        );
        assert_eq!(
            turnover_relevance(Mechanism::Odometer, &rot),
            vec![false, false, true, true, false]
        );
        let rot = [false, true, true, true, true];
        assert_eq!(
            turnover_relevance(Mechanism::Odometer, &rot),
            vec![false, false, true, true, true]
        );
        assert_eq!(
            turnover_relevance(Mechanism::Stepping, &[false, true]),
            vec![false, false]
        );
    }

    #[test]
    fn test_reflector_collapses_to_offsets() {
        let ukw = KnownWheel::UkwB.build().unwrap();
        let st = WheelStates::build(&ukw, LetterMask::FULL, LetterMask::FULL, false);
        assert_eq!(st.total(), 26);
        assert_eq!(st.live_rings(), LetterMask::single(0));
    }

    #[test]
    fn test_entry_wheel_collapses_to_one() {
        let etw = KnownWheel::EtwAbc.build().unwrap();
        let st = WheelStates::build(&etw, "ab".parse().unwrap(), "aez".parse().unwrap(), false);
        assert_eq!(st.total(), 1);
    }

    #[test]
    fn test_plug_starts() {
        let starts = plug_starts("abc".parse().unwrap());
        assert_eq!(starts.len(), 4);
        assert_eq!(starts[0], Plugboard::identity());
        assert_eq!(starts[3].to_string(), "bc");
    }
}
