//! Rotor machine model: wirings, wheels, stepping and the scrambler cache.

pub mod catalog;
pub mod key;
pub mod plugboard;
pub mod scrambler;
pub mod stepping;
pub mod wheel;
pub mod wiring;

pub use catalog::{KnownWheel, WheelCatalog};
pub use key::{Key, Mechanism, SlotState};
pub use plugboard::Plugboard;
pub use scrambler::Scrambler;
pub use stepping::{encrypt, scramble_letter, step};
pub use wheel::{Wheel, WheelSpec};
pub use wiring::Substitution;
