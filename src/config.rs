use crate::attack::{AttackOptions, Pass};
use crate::consts::{DEFAULT_BATCH_SIZE, DEFAULT_HOLD_SIZE, DEFAULT_MAX_PLUGS, DEFAULT_MIN_PLUGS};
use crate::core_types::{LetterMask, Message};
use crate::error::{RfResult, RotorForgeError};
use crate::keyspace::{KeySpaceDescriptor, SlotSpec};
use crate::machine::{Mechanism, Wheel, WheelCatalog, WheelSpec};
use crate::optimizer::{HillClimb, Reswap};
use crate::scorer::loader::{load_cribs_file, load_ngrams_file};
use crate::scorer::{Measure, NgramTable, Trie};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A JSON array of wheel definitions.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct WheelDatabase {
    pub wheels: Vec<WheelSpec>,
}

impl WheelDatabase {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RfResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn into_catalog(self) -> RfResult<WheelCatalog> {
        let mut catalog = WheelCatalog::default();
        for spec in &self.wheels {
            catalog.insert(Wheel::from_spec(spec)?)?;
        }
        Ok(catalog)
    }

    /// Catalogue from `path`, or the built-in one when no path is given.
    pub fn catalog(path: Option<&Path>) -> RfResult<WheelCatalog> {
        let Some(path) = path else {
            return WheelCatalog::builtin();
        };
        let catalog = Self::load_from_file(path)?.into_catalog()?;
        info!("Loaded {} wheels from {}", catalog.len(), path.display());
        Ok(catalog)
    }
}

fn all_letters() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

fn default_order() -> usize {
    1
}

fn default_crib_value() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SlotQuery {
    /// Candidate wheel names, separated by spaces or commas.
    pub wheels: String,
    #[serde(default = "all_letters")]
    pub rings: String,
    #[serde(default = "all_letters")]
    pub positions: String,
    #[serde(default = "default_true")]
    pub rotating: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CribEntry {
    pub word: String,
    #[serde(default = "default_crib_value")]
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "measure", rename_all = "snake_case")]
pub enum MeasureQuery {
    Ic {
        #[serde(default = "default_order")]
        order: usize,
    },
    Entropy {
        #[serde(default = "default_order")]
        order: usize,
    },
    Ngram {
        file: String,
        order: usize,
    },
    Trie {
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        words: Vec<CribEntry>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "pass", rename_all = "snake_case")]
pub enum PassQuery {
    Measure {
        measure: MeasureQuery,
    },
    HillClimb {
        early: MeasureQuery,
        #[serde(default)]
        late: Option<MeasureQuery>,
        #[serde(default)]
        min_plugs: Option<usize>,
        #[serde(default)]
        max_plugs: Option<usize>,
    },
    Reswap {
        measure: MeasureQuery,
    },
}

/// A JSON query file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QueryFile {
    #[serde(default)]
    pub mechanism: Mechanism,
    pub slots: Vec<SlotQuery>,
    #[serde(default)]
    pub plugs: String,
    pub ciphertext: String,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub hold: Option<usize>,
    #[serde(default)]
    pub workers: Option<usize>,
    /// Wheel database, relative to the query file. Built-ins when absent.
    #[serde(default)]
    pub wheels: Option<String>,
    pub passes: Vec<PassQuery>,
}

/// A query with every file resolved and every table built.
#[derive(Debug, Clone)]
pub struct Query {
    pub descriptor: KeySpaceDescriptor,
    pub passes: Vec<Pass>,
    pub ciphertext: Message,
    pub hold: Option<usize>,
    pub workers: Option<usize>,
}

/// Shares tables between passes so that their scores compare as equal measures.
#[derive(Default)]
struct TableCache {
    ngrams: HashMap<(PathBuf, usize), Arc<NgramTable>>,
    tries: HashMap<PathBuf, Arc<Trie>>,
}

impl QueryFile {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RfResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolves wheels and loads tables. Relative paths are taken from `base`.
    pub fn resolve(&self, base: &Path) -> RfResult<Query> {
        let wheels_path = self.wheels.as_ref().map(|w| base.join(w));
        let catalog = WheelDatabase::catalog(wheels_path.as_deref())?;

        let slots = self
            .slots
            .iter()
            .map(|s| {
                Ok(SlotSpec {
                    wheels: catalog.resolve_list(&s.wheels)?,
                    rings: s.rings.parse()?,
                    positions: s.positions.parse()?,
                    rotating: s.rotating,
                })
            })
            .collect::<RfResult<Vec<_>>>()?;

        let plugs: LetterMask = self.plugs.parse()?;
        let descriptor = KeySpaceDescriptor {
            mechanism: self.mechanism,
            slots,
            plugs,
            offset: self.offset,
            limit: self.limit.unwrap_or(u64::MAX),
        };
        descriptor.validate()?;

        let mut cache = TableCache::default();
        let passes = self
            .passes
            .iter()
            .map(|p| build_pass(p, base, &mut cache))
            .collect::<RfResult<Vec<_>>>()?;

        Ok(Query {
            descriptor,
            passes,
            ciphertext: Message::from_text(&self.ciphertext),
            hold: self.hold,
            workers: self.workers,
        })
    }
}

fn build_measure(q: &MeasureQuery, base: &Path, cache: &mut TableCache) -> RfResult<Measure> {
    match q {
        MeasureQuery::Ic { order } => Measure::index_of_coincidence(*order),
        MeasureQuery::Entropy { order } => Measure::entropy(*order),
        MeasureQuery::Ngram { file, order } => {
            let path = base.join(file);
            if let Some(t) = cache.ngrams.get(&(path.clone(), *order)) {
                return Ok(Measure::Ngram(Arc::clone(t)));
            }
            let entries = load_ngrams_file(&path, *order)?;
            let table = Arc::new(NgramTable::from_entries(*order, &entries)?);
            debug!("Loaded {}-gram table from {}", order, path.display());
            cache.ngrams.insert((path, *order), Arc::clone(&table));
            Ok(Measure::Ngram(table))
        }
        MeasureQuery::Trie { file, words } => {
            let mut entries: Vec<(Message, f64)> = words
                .iter()
                .map(|c| (Message::from_text(&c.word), c.value))
                .collect();
            if let Some(file) = file {
                let path = base.join(file);
                if words.is_empty() {
                    if let Some(t) = cache.tries.get(&path) {
                        return Ok(Measure::Trie(Arc::clone(t)));
                    }
                }
                entries.extend(load_cribs_file(&path)?);
                let trie = Arc::new(Trie::from_words(&entries)?);
                if words.is_empty() {
                    cache.tries.insert(path, Arc::clone(&trie));
                }
                return Ok(Measure::Trie(trie));
            }
            if entries.is_empty() {
                return Err(RotorForgeError::Config(
                    "Trie measure needs a file or inline words".into(),
                ));
            }
            Ok(Measure::Trie(Arc::new(Trie::from_words(&entries)?)))
        }
    }
}

fn build_pass(q: &PassQuery, base: &Path, cache: &mut TableCache) -> RfResult<Pass> {
    Ok(match q {
        PassQuery::Measure { measure } => Pass::Measure(build_measure(measure, base, cache)?),
        PassQuery::HillClimb {
            early,
            late,
            min_plugs,
            max_plugs,
        } => {
            let early = build_measure(early, base, cache)?;
            let late = match late {
                Some(l) => build_measure(l, base, cache)?,
                None => early.clone(),
            };
            Pass::HillClimb(HillClimb {
                early,
                late,
                min_plugs: min_plugs.unwrap_or(DEFAULT_MIN_PLUGS),
                max_plugs: max_plugs.unwrap_or(DEFAULT_MAX_PLUGS),
            })
        }
        PassQuery::Reswap { measure } => Pass::Reswap(Reswap::new(build_measure(measure, base, cache)?)),
    })
}

/// Run-time knobs shared by the CLI and query files.
#[derive(Args, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Worker threads (defaults to the query's value, then to the CPU count)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Number of results kept
    #[arg(long)]
    pub hold: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: u64,

    /// Seconds between progress reports
    #[arg(long, default_value_t = 1.0)]
    pub report_interval: f64,

    /// Stop after this many seconds
    #[arg(short = 'T', long)]
    pub time: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            workers: None,
            hold: None,
            batch_size: DEFAULT_BATCH_SIZE,
            report_interval: 1.0,
            time: None,
        }
    }
}

impl RunParams {
    /// Command-line values win over the query's.
    pub fn options(&self, query: &Query) -> AttackOptions {
        let defaults = AttackOptions::default();
        AttackOptions {
            workers: self.workers.or(query.workers).unwrap_or(defaults.workers),
            hold_size: self.hold.or(query.hold).unwrap_or(DEFAULT_HOLD_SIZE),
            batch_size: self.batch_size,
            report_interval: Duration::from_secs_f64(self.report_interval.max(0.01)),
        }
    }
}
