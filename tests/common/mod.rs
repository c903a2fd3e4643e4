#![allow(dead_code)]

use rotorforge::core_types::{LetterMask, Message};
use rotorforge::keyspace::{KeySpaceDescriptor, SlotSpec};
use rotorforge::machine::{Key, Mechanism, Plugboard, WheelCatalog};
use rotorforge::scorer::loader::load_ngrams_file;
use rotorforge::scorer::NgramTable;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

pub const PLAINTEXT: &str = "the weather report for the northern sector indicates fog and light rain until noon \
     all units will hold their present positions and await further orders from headquarters";

pub const TRUE_PLUGS: &str = "ar gk ox bt lp mu";

pub fn data_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(relative)
}

pub fn english_bigrams() -> Arc<NgramTable> {
    let entries = load_ngrams_file(data_path("ngrams/english-2.tsv"), 2).unwrap();
    Arc::new(NgramTable::from_entries(2, &entries).unwrap())
}

pub fn catalog() -> WheelCatalog {
    WheelCatalog::builtin().unwrap()
}

/// A key on the five-slot army machine: reflector, three wheels, entry wheel.
pub fn army_key(wheels: &str, rings: &str, positions: &str, plugs: &str) -> Key {
    let cat = catalog();
    Key::assemble(
        Mechanism::Stepping,
        cat.resolve_list(&format!("UKW-B {} ETW-ABC", wheels)).unwrap(),
        rings,
        positions,
        Plugboard::from_pairs(plugs).unwrap(),
    )
    .unwrap()
}

/// Builder for key space descriptors.
pub struct SpaceBuilder {
    desc: KeySpaceDescriptor,
}

impl SpaceBuilder {
    pub fn new(mechanism: Mechanism) -> Self {
        Self {
            desc: KeySpaceDescriptor::new(mechanism, Vec::new()),
        }
    }

    pub fn slot(mut self, wheels: &str, rings: &str, positions: &str) -> Self {
        let cat = catalog();
        self.desc.slots.push(SlotSpec::new(
            cat.resolve_list(wheels).unwrap(),
            rings.parse().unwrap(),
            positions.parse().unwrap(),
        ));
        self
    }

    pub fn fixed_slot(mut self, wheels: &str, rings: &str, positions: &str) -> Self {
        self = self.slot(wheels, rings, positions);
        if let Some(last) = self.desc.slots.last_mut() {
            last.rotating = false;
        }
        self
    }

    pub fn plugs(mut self, plugs: &str) -> Self {
        self.desc.plugs = plugs.parse::<LetterMask>().unwrap();
        self
    }

    pub fn range(mut self, offset: u64, limit: u64) -> Self {
        self.desc.offset = offset;
        self.desc.limit = limit;
        self
    }

    pub fn build(self) -> KeySpaceDescriptor {
        self.desc
    }
}

/// Five slots, every slot limited to the same ring and position letters.
pub fn uniform_space(wheels: &str, rings: &str, positions: &str) -> KeySpaceDescriptor {
    wheels
        .split_whitespace()
        .fold(SpaceBuilder::new(Mechanism::Stepping), |b, w| {
            b.slot(w, rings, positions)
        })
        .build()
}

/// Every key a cursor visits, in order.
pub fn walk(space: &rotorforge::keyspace::KeySpace) -> Vec<Key> {
    let mut keys = Vec::new();
    if let Some(mut cursor) = space.init() {
        keys.push(cursor.key().clone());
        while cursor.advance().is_some() {
            keys.push(cursor.key().clone());
        }
    }
    keys
}

pub fn distinct_strings(keys: &[Key]) -> HashSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

pub fn encrypt_text(key: &Key, text: &str) -> Message {
    let mut key = key.clone();
    key.encrypt(&Message::from_text(text))
}
