use crate::core_types::LetterMask;
use crate::error::{RfResult, RotorForgeError};
use crate::machine::{Mechanism, Wheel};
use std::sync::Arc;

/// Constraints for one slot of the machine.
#[derive(Debug, Clone)]
pub struct SlotSpec {
    pub wheels: Vec<Arc<Wheel>>,
    pub rings: LetterMask,
    pub positions: LetterMask,
    pub rotating: bool,
}

impl SlotSpec {
    pub fn new(wheels: Vec<Arc<Wheel>>, rings: LetterMask, positions: LetterMask) -> Self {
        Self {
            wheels,
            rings,
            positions,
            rotating: true,
        }
    }

    /// Rotation of the slot once a wheel is mounted. Validation guarantees
    /// every candidate agrees.
    pub fn effective_rotating(&self) -> bool {
        self.rotating && self.wheels.first().map(|w| w.rotating).unwrap_or(false)
    }
}

/// Parsed description of a key space. Slots run left to right,
/// reflector first and entry wheel last.
#[derive(Debug, Clone)]
pub struct KeySpaceDescriptor {
    pub mechanism: Mechanism,
    pub slots: Vec<SlotSpec>,
    /// Letters whose single-cable plugboards seed the search.
    pub plugs: LetterMask,
    pub offset: u64,
    /// `u64::MAX` means unlimited.
    pub limit: u64,
}

impl KeySpaceDescriptor {
    pub fn new(mechanism: Mechanism, slots: Vec<SlotSpec>) -> Self {
        Self {
            mechanism,
            slots,
            plugs: LetterMask::EMPTY,
            offset: 0,
            limit: u64::MAX,
        }
    }

    pub fn validate(&self) -> RfResult<()> {
        if self.slots.is_empty() {
            return Err(RotorForgeError::Config(
                "Key space needs at least one slot".into(),
            ));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.wheels.is_empty() {
                return Err(RotorForgeError::Config(format!("Slot {} has no wheels", i)));
            }
            if slot.rings.is_empty() {
                return Err(RotorForgeError::Config(format!(
                    "Slot {} has an empty ring mask",
                    i
                )));
            }
            if slot.positions.is_empty() {
                return Err(RotorForgeError::Config(format!(
                    "Slot {} has an empty position mask",
                    i
                )));
            }
            let rotating = slot.effective_rotating();
            if let Some(w) = slot
                .wheels
                .iter()
                .find(|w| (slot.rotating && w.rotating) != rotating)
            {
                return Err(RotorForgeError::Config(format!(
                    "Slot {} mixes rotating and fixed wheels ('{}')",
                    i, w.name
                )));
            }
        }
        // Slot 0 turns the current around; the machine is only reciprocal
        // when every candidate there is a fixed-point free involution.
        if let Some(w) = self.slots[0].wheels.iter().find(|w| !w.is_reflector()) {
            return Err(RotorForgeError::Config(format!(
                "Wheel '{}' in slot 0 is not a reflector",
                w.name
            )));
        }
        Ok(())
    }
}
