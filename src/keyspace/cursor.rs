use super::tables::KeySpaceShape;
use crate::core_types::Letter;
use crate::machine::{Key, SlotState};
use std::sync::Arc;

/// What changed between two consecutive keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Only the starting plugboard differs; the scrambler can be reused.
    Plugboard,
    /// Wheels, rings or positions moved.
    Mechanical,
}

/// Walks a key space, owning and mutating a single [`Key`].
/// Clone the key to keep a stable copy.
#[derive(Debug)]
pub struct KeyCursor {
    shape: Arc<KeySpaceShape>,
    key: Key,
    assignment: usize,
    plug: usize,
    index: u64,
    remaining: u64,
}

impl KeyCursor {
    /// Positions a cursor on key `index`, with `remaining` keys left after it.
    pub(crate) fn seek(shape: Arc<KeySpaceShape>, index: u64, remaining: u64) -> Option<Self> {
        if index >= shape.total {
            return None;
        }
        let assignment = shape.cumulative.partition_point(|&c| c <= index) - 1;
        let local = index - shape.cumulative[assignment];
        let plug_factor = shape.plug_starts.len() as u64;
        let plug = (local % plug_factor) as usize;
        let mut mech = local / plug_factor;

        let n = shape.slots.len();
        let totals: Vec<u64> = (0..n)
            .map(|s| shape.wheel_states(assignment, s).total())
            .collect();
        let mut after = vec![1u64; n];
        for s in (0..n.saturating_sub(1)).rev() {
            after[s] = after[s + 1] * totals[s + 1];
        }

        // Rings, slowest slot first, in blocks weighted by the states they leave open.
        let mut rings: Vec<Letter> = Vec::with_capacity(n);
        let mut prefix = 1u64;
        for (s, &tail) in after.iter().enumerate() {
            let states = shape.wheel_states(assignment, s);
            let mut chosen = states.first_ring();
            for r in states.live_rings().iter() {
                let block = prefix * states.count(r) * tail;
                if mech < block {
                    chosen = r;
                    break;
                }
                mech -= block;
            }
            prefix *= states.count(chosen);
            rings.push(chosen);
        }

        // Positions, mixed radix with the rightmost slot fastest.
        let mut positions: Vec<Letter> = vec![0; n];
        for s in (0..n).rev() {
            let states = shape.wheel_states(assignment, s);
            let radix = states.count(rings[s]);
            let digit = (mech % radix) as usize;
            mech /= radix;
            positions[s] = states.positions(rings[s]).iter().nth(digit).unwrap_or(0);
        }

        let slots = shape
            .slots
            .iter()
            .enumerate()
            .map(|(s, spec)| {
                let wheel = spec.wheels[shape.assignments[assignment][s]].clone();
                SlotState::new(wheel, rings[s], positions[s], spec.rotating)
            })
            .collect();
        let key = Key {
            mechanism: shape.mechanism,
            slots,
            plugboard: shape.plug_starts[plug],
        };

        Some(Self {
            shape,
            key,
            assignment,
            plug,
            index,
            remaining,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Absolute index of the current key in the unsliced space.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Keys still to come after the current one.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Moves to the next key. `None` once the slice is exhausted.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.index += 1;

        let shape = &*self.shape;
        if self.plug + 1 < shape.plug_starts.len() {
            self.plug += 1;
            self.key.plugboard = shape.plug_starts[self.plug];
            return Some(Advance::Plugboard);
        }
        self.plug = 0;
        self.key.plugboard = shape.plug_starts[0];

        if next_positions(shape, self.assignment, &mut self.key)
            || next_rings(shape, self.assignment, &mut self.key)
        {
            return Some(Advance::Mechanical);
        }

        self.assignment += 1;
        if self.assignment >= shape.assignments.len() {
            self.remaining = 0;
            return None;
        }
        load_assignment(shape, self.assignment, &mut self.key);
        Some(Advance::Mechanical)
    }
}

fn next_positions(shape: &KeySpaceShape, assignment: usize, key: &mut Key) -> bool {
    for s in (0..key.slots.len()).rev() {
        let states = shape.wheel_states(assignment, s);
        let slot = &mut key.slots[s];
        let mask = states.positions(slot.ring);
        if let Some(p) = mask.next_after(slot.position) {
            slot.position = p;
            return true;
        }
        slot.position = states.first_position(slot.ring);
    }
    false
}

fn next_rings(shape: &KeySpaceShape, assignment: usize, key: &mut Key) -> bool {
    let mut moved = false;
    for s in (0..key.slots.len()).rev() {
        let states = shape.wheel_states(assignment, s);
        let slot = &mut key.slots[s];
        if let Some(r) = states.live_rings().next_after(slot.ring) {
            slot.ring = r;
            moved = true;
            break;
        }
        slot.ring = states.first_ring();
    }
    for s in 0..key.slots.len() {
        let states = shape.wheel_states(assignment, s);
        let slot = &mut key.slots[s];
        slot.position = states.first_position(slot.ring);
    }
    moved
}

fn load_assignment(shape: &KeySpaceShape, assignment: usize, key: &mut Key) {
    for (s, spec) in shape.slots.iter().enumerate() {
        let states = shape.wheel_states(assignment, s);
        let wheel = spec.wheels[shape.assignments[assignment][s]].clone();
        let ring = states.first_ring();
        key.slots[s] = SlotState::new(wheel, ring, states.first_position(ring), spec.rotating);
    }
}
