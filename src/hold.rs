use crate::error::{RfResult, RotorForgeError};
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct HoldElement<P> {
    pub score: f64,
    pub payload: P,
    pub preview: String,
}

/// Bounded best-first collection shared by all workers.
///
/// Elements are kept in descending score order; equal scores keep arrival
/// order. Arrival order between workers depends on thread scheduling, so
/// ties found by different workers may be ranked differently from run to run.
/// An element equal in score and payload to one already held is dropped.
#[derive(Debug)]
pub struct Hold<P> {
    capacity: usize,
    elements: Mutex<Vec<HoldElement<P>>>,
}

impl<P: PartialEq> Hold<P> {
    pub fn new(capacity: usize) -> RfResult<Self> {
        if capacity == 0 {
            return Err(RotorForgeError::Config("Hold capacity must be positive".into()));
        }
        let mut elements = Vec::new();
        elements.try_reserve_exact(capacity + 1)?;
        Ok(Self {
            capacity,
            elements: Mutex::new(elements),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HoldElement<P>>> {
        // A panicking worker cannot leave the list half-shifted.
        self.elements.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn boundary_of(&self, elements: &[HoldElement<P>]) -> f64 {
        if elements.len() >= self.capacity {
            elements[self.capacity - 1].score
        } else {
            f64::NEG_INFINITY
        }
    }

    /// Offers an element and returns the score a newcomer now has to beat.
    /// Callers may skip building a payload for scores not above it.
    pub fn add(&self, score: f64, payload: P, preview: String) -> f64 {
        let mut elements = self.lock();
        if score.is_nan() {
            return self.boundary_of(&elements);
        }

        let mut pos = elements.len();
        while pos > 0 && elements[pos - 1].score < score {
            pos -= 1;
        }
        if pos >= self.capacity {
            return self.boundary_of(&elements);
        }

        let duplicate = elements[..pos]
            .iter()
            .rev()
            .take_while(|e| e.score == score)
            .any(|e| e.payload == payload);
        if !duplicate {
            elements.insert(
                pos,
                HoldElement {
                    score,
                    payload,
                    preview,
                },
            );
            elements.truncate(self.capacity);
        }
        self.boundary_of(&elements)
    }

    pub fn boundary(&self) -> f64 {
        let elements = self.lock();
        self.boundary_of(&elements)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn scores(&self) -> Vec<f64> {
        self.lock().iter().map(|e| e.score).collect()
    }
}

impl<P: PartialEq + Clone> Hold<P> {
    pub fn elements(&self) -> Vec<HoldElement<P>> {
        self.lock().clone()
    }
}

impl<P: PartialEq + Display> Hold<P> {
    /// Top `n` entries as `(score, preview, payload description)`.
    pub fn snapshot(&self, n: usize) -> Vec<(f64, String, String)> {
        self.lock()
            .iter()
            .take(n)
            .map(|e| (e.score, e.preview.clone(), e.payload.to_string()))
            .collect()
    }
}
