//! Entry points for front ends: build the pieces, run the attack, read results.

use crate::attack::{Attack, AttackOptions};
use crate::config::{QueryFile, RunParams};
use crate::core_types::Message;
use crate::error::RfResult;
use crate::keyspace::{KeySpace, KeySpaceDescriptor};
use crate::scorer::{NgramTable, Trie};
use std::path::Path;

pub use crate::attack::run_attack;

pub fn build_key_space(descriptor: &KeySpaceDescriptor) -> RfResult<KeySpace> {
    KeySpace::new(descriptor)
}

pub fn load_ngram_table(order: usize, entries: &[(Message, f64)]) -> RfResult<NgramTable> {
    NgramTable::from_entries(order, entries)
}

pub fn build_trie(words: &[(Message, f64)]) -> RfResult<Trie> {
    Trie::from_words(words)
}

/// Reads a query file and sets up its attack. Files named in the query are
/// resolved relative to the query's directory.
pub fn prepare_attack<P: AsRef<Path>>(path: P, params: &RunParams) -> RfResult<Attack> {
    let path = path.as_ref();
    let file = QueryFile::load_from_file(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let query = file.resolve(base)?;
    let options: AttackOptions = params.options(&query);
    let space = build_key_space(&query.descriptor)?;
    Attack::new(space, query.passes, query.ciphertext, options)
}
