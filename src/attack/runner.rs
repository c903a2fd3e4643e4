use super::passes::{run_passes, Pass};
use super::progress::Progress;
use super::CancelToken;
use crate::consts::PREVIEW_LEN;
use crate::core_types::{letters_to_string, Letter};
use crate::error::RfResult;
use crate::hold::Hold;
use crate::keyspace::{Advance, KeySpace};
use crate::machine::{Key, Scrambler};
use crate::optimizer::Probe;
use crate::scorer::Evaluator;
use std::sync::Mutex;
use std::time::Instant;
use tracing::debug;

fn publish(record: &Mutex<Progress>, keys: u64, evaluator: &mut Evaluator, started: Instant, batch: Instant) {
    let mut p = record.lock().unwrap_or_else(|e| e.into_inner());
    p.completed_units += keys;
    p.decrypts += evaluator.take_decrypts();
    p.elapsed = started.elapsed().as_secs_f64();
    p.last_batch = batch.elapsed().as_secs_f64();
}

/// Worker loop: scores every key of `space` and offers the good ones to `hold`.
///
/// Cancellation is checked between keys, never inside a pass.
pub fn run_attack(
    space: &KeySpace,
    passes: &[Pass],
    ciphertext: &[Letter],
    hold: &Hold<Key>,
    progress: &Mutex<Progress>,
    cancel: &CancelToken,
) -> RfResult<()> {
    let batch_size = {
        let mut p = progress.lock().unwrap_or_else(|e| e.into_inner());
        p.total_units = space.count();
        p.batch_size.max(1)
    };
    let Some(mut cursor) = space.init() else {
        debug!("Empty slice, nothing to search");
        return Ok(());
    };

    let mut scrambler = Scrambler::new(ciphertext.len())?;
    let mut evaluator = Evaluator::new(ciphertext.len())?;
    let mut preview: Vec<Letter> = Vec::new();
    preview.try_reserve_exact(ciphertext.len())?;

    let mut key = cursor.key().clone();
    scrambler.generate(&mut key);
    let mut boundary = hold.boundary();

    let started = Instant::now();
    let mut batch_started = started;
    let mut in_batch = 0u64;
    let mut visited = 0u64;

    loop {
        if cancel.is_cancelled() {
            debug!(visited, "Worker stopping on cancellation");
            break;
        }

        let mut pb = cursor.key().plugboard;
        let score = {
            let mut probe = Probe::new(&scrambler, ciphertext, &mut evaluator);
            run_passes(passes, &mut pb, &mut probe)
        };

        if score > boundary {
            let mut snapshot = cursor.key().clone();
            snapshot.plugboard = pb;
            scrambler.decrypt_into(&pb, ciphertext, &mut preview);
            let shown = &preview[..preview.len().min(PREVIEW_LEN)];
            boundary = hold.add(score, snapshot, letters_to_string(shown));
        }

        in_batch += 1;
        visited += 1;
        if in_batch >= batch_size {
            publish(progress, in_batch, &mut evaluator, started, batch_started);
            in_batch = 0;
            batch_started = Instant::now();
            boundary = hold.boundary();
        }

        match cursor.advance() {
            None => break,
            Some(Advance::Plugboard) => {}
            Some(Advance::Mechanical) => {
                key.clone_from(cursor.key());
                scrambler.generate(&mut key);
            }
        }
    }

    publish(progress, in_batch, &mut evaluator, started, batch_started);
    debug!(visited, "Worker finished");
    Ok(())
}
