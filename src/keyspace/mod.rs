//! Enumeration of mechanical and plugboard keys under per-slot constraints.
//!
//! Axes, outermost first: wheel assignment, ring vector, position vector,
//! starting plugboard. Every axis runs with the rightmost slot fastest.

pub mod cursor;
pub mod descriptor;
pub mod tables;

pub use cursor::{Advance, KeyCursor};
pub use descriptor::{KeySpaceDescriptor, SlotSpec};

use crate::error::RfResult;
use crate::machine::{Key, Mechanism};
use std::sync::Arc;
use tables::KeySpaceShape;
use tracing::info;

/// A contiguous range `[offset, offset + count)` of an enumerated key space.
#[derive(Debug, Clone)]
pub struct KeySpace {
    shape: Arc<KeySpaceShape>,
    offset: u64,
    limit: u64,
}

impl KeySpace {
    pub fn new(desc: &KeySpaceDescriptor) -> RfResult<Self> {
        let shape = KeySpaceShape::build(desc)?;
        Ok(Self {
            shape: Arc::new(shape),
            offset: desc.offset,
            limit: desc.limit,
        })
    }

    pub fn mechanism(&self) -> Mechanism {
        self.shape.mechanism
    }

    /// Distinct keys in the whole space, ignoring offset and limit.
    pub fn total(&self) -> u64 {
        self.shape.total
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Keys this range will visit.
    pub fn count(&self) -> u64 {
        self.shape.total.saturating_sub(self.offset).min(self.limit)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Cursor on the first key of the range, or `None` if there is nothing to search.
    pub fn init(&self) -> Option<KeyCursor> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        KeyCursor::seek(Arc::clone(&self.shape), self.offset, count - 1)
    }

    /// The key at absolute `index`, if the space has one.
    pub fn key_at(&self, index: u64) -> Option<Key> {
        KeyCursor::seek(Arc::clone(&self.shape), index, 0).map(|c| c.key().clone())
    }

    /// Splits the range into at most `n` contiguous non-empty parts.
    pub fn slice(&self, n: usize) -> Vec<KeySpace> {
        let count = self.count();
        let parts = (n as u64).min(count);
        if parts == 0 {
            return Vec::new();
        }
        let base = count / parts;
        let extra = count % parts;

        let mut offset = self.offset;
        let slices: Vec<KeySpace> = (0..parts)
            .map(|i| {
                let size = base + u64::from(i < extra);
                let part = KeySpace {
                    shape: Arc::clone(&self.shape),
                    offset,
                    limit: size,
                };
                offset += size;
                part
            })
            .collect();

        info!(
            requested = n,
            produced = slices.len(),
            keys = count,
            "Sliced key space"
        );
        slices
    }
}
