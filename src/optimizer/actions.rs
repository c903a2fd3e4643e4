//! Edit tables for trying every rewiring of a letter pair.
//!
//! A table works on four cells `[i, p[i], k, p[k]]`. `SwapCells(a, b)`
//! exchanges the plugboard entries of the letters in cells `a` and `b`,
//! which plugs two free letters together or unplugs a mutual pair.
//! Every table leaves the board as it found it.

use crate::core_types::Letter;
use crate::machine::Plugboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlugOp {
    SwapCells(u8, u8),
    /// Score the board as it stands.
    Checkpoint,
}

use PlugOp::{Checkpoint, SwapCells};

/// `i` and `k` both unplugged: try `i-k`.
pub const BOTH_FREE: &[PlugOp] = &[SwapCells(0, 2), Checkpoint, SwapCells(0, 2)];

/// `i` unplugged, `k` plugged to `p[k]`: try `i-k`, `i-p[k]`, and dropping `k-p[k]`.
pub const ONE_PLUGGED: &[PlugOp] = &[
    SwapCells(2, 3),
    SwapCells(0, 2),
    Checkpoint,
    SwapCells(0, 2),
    SwapCells(0, 3),
    Checkpoint,
    SwapCells(0, 3),
    Checkpoint,
    SwapCells(2, 3),
];

/// `i-p[i]` and `k-p[k]`: try `i-k` alone, `i-k` with `p[i]-p[k]`,
/// `i-p[k]` with `p[i]-k`, and `i-p[k]` alone.
pub const BOTH_PLUGGED: &[PlugOp] = &[
    SwapCells(0, 1),
    SwapCells(2, 3),
    SwapCells(0, 2),
    Checkpoint,
    SwapCells(1, 3),
    Checkpoint,
    SwapCells(0, 2),
    SwapCells(1, 3),
    SwapCells(0, 3),
    SwapCells(1, 2),
    Checkpoint,
    SwapCells(1, 2),
    Checkpoint,
    SwapCells(0, 3),
    SwapCells(0, 1),
    SwapCells(2, 3),
];

/// Picks the table for the pair `(i, k)` and its cells, or `None` when
/// `i` and `k` are plugged to each other.
pub fn classify(pb: &Plugboard, i: Letter, k: Letter) -> Option<(&'static [PlugOp], [Letter; 4])> {
    let (pi, pk) = (pb.get(i), pb.get(k));
    if pi == k {
        return None;
    }
    match (pi == i, pk == k) {
        (true, true) => Some((BOTH_FREE, [i, i, k, k])),
        (true, false) => Some((ONE_PLUGGED, [i, i, k, pk])),
        (false, true) => Some((ONE_PLUGGED, [k, k, i, pi])),
        (false, false) => Some((BOTH_PLUGGED, [i, pi, k, pk])),
    }
}

/// Runs `table` on `pb`. `eval` receives the board and the change in plug
/// count at each checkpoint and returns its score, or `None` to skip it.
/// The best checkpoint strictly above `baseline` is replayed onto the board
/// and its score returned.
pub fn run_table(
    table: &[PlugOp],
    cells: [Letter; 4],
    pb: &mut Plugboard,
    baseline: f64,
    mut eval: impl FnMut(&Plugboard, i32) -> Option<f64>,
) -> Option<f64> {
    let mut best = baseline;
    let mut best_at = None;
    let mut delta = 0i32;

    for (n, op) in table.iter().enumerate() {
        match *op {
            SwapCells(a, b) => {
                let (x, y) = (cells[a as usize], cells[b as usize]);
                delta += if pb.is_free(x) { 1 } else { -1 };
                pb.swap_cells(x, y);
            }
            Checkpoint => {
                if let Some(score) = eval(pb, delta) {
                    if score > best {
                        best = score;
                        best_at = Some(n);
                    }
                }
            }
        }
    }

    let stop = best_at?;
    for op in &table[..stop] {
        if let SwapCells(a, b) = *op {
            pb.swap_cells(cells[a as usize], cells[b as usize]);
        }
    }
    Some(best)
}
