use super::plugboard::Plugboard;
use super::wheel::Wheel;
use crate::core_types::{letter_from_char, letter_to_char, Letter, Message};
use crate::error::{RfResult, RotorForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// How the rotating wheels carry into each other.
#[derive(
    Debug, Clone, Copy, Default, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Ratchet-and-pawl drive with the double step of the middle wheel.
    #[default]
    Stepping,
    /// Plain carry propagation, like a mileage counter.
    Odometer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotState {
    pub wheel: Arc<Wheel>,
    pub ring: Letter,
    pub position: Letter,
    /// Slot flag and wheel flag combined.
    pub rotating: bool,
}

impl SlotState {
    pub fn new(wheel: Arc<Wheel>, ring: Letter, position: Letter, slot_rotating: bool) -> Self {
        let rotating = slot_rotating && wheel.rotating;
        Self {
            wheel,
            ring,
            position,
            rotating,
        }
    }

    /// Offset added on entry to the wiring and removed on exit.
    #[inline(always)]
    pub fn offset(&self) -> i32 {
        self.position as i32 - self.ring as i32
    }
}

/// A complete machine setting. Slots run left to right, reflector first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    pub mechanism: Mechanism,
    pub slots: Vec<SlotState>,
    pub plugboard: Plugboard,
}

impl Key {
    pub fn new(mechanism: Mechanism, slots: Vec<SlotState>, plugboard: Plugboard) -> RfResult<Self> {
        if slots.is_empty() {
            return Err(RotorForgeError::Config("A key needs at least one slot".into()));
        }
        Ok(Self {
            mechanism,
            slots,
            plugboard,
        })
    }

    /// Assembles a key from wheels plus ring and position strings, one letter per slot.
    /// Every slot is allowed to rotate; the wheel flag decides.
    pub fn assemble(
        mechanism: Mechanism,
        wheels: Vec<Arc<Wheel>>,
        rings: &str,
        positions: &str,
        plugboard: Plugboard,
    ) -> RfResult<Self> {
        let rings = parse_setting(rings, wheels.len(), "rings")?;
        let positions = parse_setting(positions, wheels.len(), "positions")?;
        let slots = wheels
            .into_iter()
            .zip(rings)
            .zip(positions)
            .map(|((wheel, ring), pos)| SlotState::new(wheel, ring, pos, true))
            .collect();
        Self::new(mechanism, slots, plugboard)
    }

    pub fn positions(&self) -> Vec<Letter> {
        self.slots.iter().map(|s| s.position).collect()
    }

    pub fn set_positions(&mut self, positions: &[Letter]) {
        for (slot, &p) in self.slots.iter_mut().zip(positions) {
            slot.position = p;
        }
    }

    /// Index of the rightmost rotating slot.
    pub fn fast_slot(&self) -> Option<usize> {
        self.slots.iter().rposition(|s| s.rotating)
    }

    /// Encrypts (equivalently decrypts) `message`; the mechanical state is unchanged on return.
    pub fn encrypt(&mut self, message: &Message) -> Message {
        super::stepping::encrypt(self, message)
    }

    pub fn wheel_names(&self) -> String {
        self.slots
            .iter()
            .map(|s| s.wheel.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_setting(s: &str, slots: usize, what: &str) -> RfResult<Vec<Letter>> {
    let letters: Vec<Letter> = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            letter_from_char(c)
                .ok_or_else(|| RotorForgeError::Config(format!("Invalid letter '{}' in {}", c, what)))
        })
        .collect::<RfResult<_>>()?;
    if letters.len() != slots {
        return Err(RotorForgeError::Config(format!(
            "Expected {} {}, got {}",
            slots,
            what,
            letters.len()
        )));
    }
    Ok(letters)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | ", self.wheel_names())?;
        for s in &self.slots {
            write!(f, "{}", letter_to_char(s.ring))?;
        }
        f.write_str(" | ")?;
        for s in &self.slots {
            write!(f, "{}", letter_to_char(s.position))?;
        }
        write!(f, " | {}", self.plugboard)
    }
}
