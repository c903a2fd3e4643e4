use crate::core_types::Message;
use crate::error::RfResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(input)
}

/// Splits a row on tabs, or on spaces when the row holds a single field.
fn fields(rec: &csv::StringRecord) -> Vec<String> {
    if rec.len() == 1 {
        rec[0].split_whitespace().map(str::to_string).collect()
    } else {
        rec.iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    }
}

/// Reads `gram<TAB>count` rows. Rows with a gram of the wrong length or an
/// unparsable count are skipped.
pub fn load_ngrams<R: Read>(input: R, order: usize) -> RfResult<Vec<(Message, f64)>> {
    let mut rdr = reader(input);
    let mut entries = Vec::new();
    let mut skipped = 0usize;
    let mut rows = 0usize;

    for result in rdr.records() {
        rows += 1;
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                debug!("[Row {}] CSV parse error: {}", rows, e);
                skipped += 1;
                continue;
            }
        };
        let cols = fields(&rec);
        if cols.len() < 2 {
            skipped += 1;
            continue;
        }
        let gram = Message::from_text(&cols[0]);
        if gram.len() != order || cols[0].chars().count() != order {
            skipped += 1;
            continue;
        }
        match cols[1].parse::<f64>() {
            Ok(count) if count.is_finite() && count > 0.0 => entries.push((gram, count)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed rows in {}-gram data", skipped, order);
    }
    debug!(rows, loaded = entries.len(), order, "Loaded n-gram rows");
    Ok(entries)
}

pub fn load_ngrams_file<P: AsRef<Path>>(path: P, order: usize) -> RfResult<Vec<(Message, f64)>> {
    let file = File::open(path)?;
    load_ngrams(file, order)
}

/// Reads `word[<TAB>value]` rows; the value defaults to 1.
pub fn load_cribs<R: Read>(input: R) -> RfResult<Vec<(Message, f64)>> {
    let mut rdr = reader(input);
    let mut words = Vec::new();
    let mut skipped = 0usize;

    for rec in rdr.records() {
        let Ok(rec) = rec else {
            skipped += 1;
            continue;
        };
        let cols = fields(&rec);
        let Some(word) = cols.first() else {
            continue;
        };
        let word = Message::from_text(word);
        if word.is_empty() {
            skipped += 1;
            continue;
        }
        let value = match cols.get(1) {
            None => 1.0,
            Some(v) => match v.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    skipped += 1;
                    continue;
                }
            },
        };
        words.push((word, value));
    }

    if skipped > 0 {
        warn!("Skipped {} malformed crib rows", skipped);
    }
    debug!(words = words.len(), "Loaded cribs");
    Ok(words)
}

pub fn load_cribs_file<P: AsRef<Path>>(path: P) -> RfResult<Vec<(Message, f64)>> {
    let file = File::open(path)?;
    load_cribs(file)
}
