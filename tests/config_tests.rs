mod common;

use common::data_path;
use rotorforge::api::{build_key_space, prepare_attack};
use rotorforge::attack::Pass;
use rotorforge::config::{MeasureQuery, PassQuery, QueryFile, RunParams, WheelDatabase};
use rotorforge::consts::{DEFAULT_HOLD_SIZE, DEFAULT_MAX_PLUGS, DEFAULT_MIN_PLUGS};
use rotorforge::error::RotorForgeError;
use rotorforge::machine::{Mechanism, WheelCatalog};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BIGRAMS: &str = "th\t100\nhe\t80\nin\t60\ner\t50\n";

/// A scratch directory holding a bigram file and a query that refers to it.
fn scratch(query: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bigrams.tsv"), BIGRAMS).unwrap();
    let path = dir.path().join("query.json");
    fs::write(&path, query).unwrap();
    (dir, path)
}

fn resolve(path: &Path) -> rotorforge::config::Query {
    QueryFile::load_from_file(path)
        .unwrap()
        .resolve(path.parent().unwrap())
        .unwrap()
}

#[test]
fn test_sample_query_resolves() {
    let path = data_path("queries/sample.json");
    let query = resolve(&path);

    assert_eq!(query.descriptor.mechanism, Mechanism::Stepping);
    assert_eq!(query.descriptor.slots.len(), 5);
    assert_eq!(query.descriptor.slots[1].wheels.len(), 3);
    assert_eq!(query.ciphertext.len(), 217);
    assert_eq!(query.hold, Some(10));
    assert_eq!(query.workers, None);
    assert_eq!(query.passes.len(), 2);
    assert!(matches!(query.passes[0], Pass::HillClimb(_)));
    assert!(matches!(query.passes[1], Pass::Reswap(_)));

    let space = build_key_space(&query.descriptor).unwrap();
    assert_eq!(space.count(), 6 * 26 * 26 * 26);
}

#[test]
fn test_defaults_fill_missing_fields() {
    let (_dir, path) = scratch(
        r#"{
            "slots": [ { "wheels": "UKW-B" }, { "wheels": "I", "positions": "ab" } ],
            "ciphertext": "Hello, World",
            "passes": [ { "pass": "hill_climb", "early": { "measure": "ngram", "file": "bigrams.tsv", "order": 2 } } ]
        }"#,
    );
    let query = resolve(&path);

    assert_eq!(query.descriptor.mechanism, Mechanism::Stepping);
    assert_eq!(query.descriptor.limit, u64::MAX);
    assert_eq!(query.descriptor.offset, 0);
    assert!(query.descriptor.plugs.is_empty());
    assert_eq!(query.ciphertext.to_string(), "helloworld");

    let Pass::HillClimb(climb) = &query.passes[0] else {
        panic!("expected a hill climb");
    };
    assert!(climb.early.same_as(&climb.late));
    assert_eq!(climb.min_plugs, DEFAULT_MIN_PLUGS);
    assert_eq!(climb.max_plugs, DEFAULT_MAX_PLUGS);
}

#[test]
fn test_same_file_shares_one_table() {
    let (_dir, path) = scratch(
        r#"{
            "slots": [ { "wheels": "UKW-B" } ],
            "ciphertext": "abc",
            "passes": [
                { "pass": "hill_climb",
                  "early": { "measure": "ic" },
                  "late": { "measure": "ngram", "file": "bigrams.tsv", "order": 2 },
                  "min_plugs": 2, "max_plugs": 6 },
                { "pass": "reswap", "measure": { "measure": "ngram", "file": "bigrams.tsv", "order": 2 } }
            ]
        }"#,
    );
    let query = resolve(&path);

    let (Pass::HillClimb(climb), Pass::Reswap(reswap)) = (&query.passes[0], &query.passes[1]) else {
        panic!("unexpected passes");
    };
    assert!(climb.late.same_as(&reswap.measure));
    assert!(!climb.early.same_as(&climb.late));
    assert_eq!((climb.min_plugs, climb.max_plugs), (2, 6));
}

#[test]
fn test_trie_from_inline_words_and_file() {
    let (dir, path) = scratch(
        r#"{
            "slots": [ { "wheels": "UKW-B" } ],
            "ciphertext": "abc",
            "passes": [
                { "pass": "measure", "measure": { "measure": "trie", "words": [ { "word": "wetter" }, { "word": "bericht", "value": 5 } ] } },
                { "pass": "measure", "measure": { "measure": "trie", "file": "cribs.txt" } }
            ]
        }"#,
    );
    fs::write(dir.path().join("cribs.txt"), "wetter\t2\nnord\n").unwrap();
    let query = resolve(&path);
    assert_eq!(query.passes[0].to_string(), "measure[trie(2 words)]");
    assert_eq!(query.passes[1].to_string(), "measure[trie(2 words)]");
}

#[test]
fn test_trie_without_words_is_rejected() {
    let (_dir, path) = scratch(
        r#"{
            "slots": [ { "wheels": "UKW-B" } ],
            "ciphertext": "abc",
            "passes": [ { "pass": "measure", "measure": { "measure": "trie" } } ]
        }"#,
    );
    let err = QueryFile::load_from_file(&path)
        .unwrap()
        .resolve(path.parent().unwrap())
        .unwrap_err();
    assert!(matches!(err, RotorForgeError::Config(_)));
}

#[test]
fn test_unknown_tags_are_json_errors() {
    let (_dir, path) = scratch(
        r#"{
            "slots": [ { "wheels": "UKW-B" } ],
            "ciphertext": "abc",
            "passes": [ { "pass": "anneal" } ]
        }"#,
    );
    assert!(matches!(
        QueryFile::load_from_file(&path),
        Err(RotorForgeError::Json(_))
    ));
}

#[test]
fn test_query_errors_surface() {
    for (slots, plugs) in [
        (r#"[ { "wheels": "UKW-Z" } ]"#, ""),
        (r#"[ { "wheels": "I", "rings": "a1" } ]"#, ""),
        (r#"[ { "wheels": "I" } ]"#, "ab!"),
        (r#"[]"#, ""),
    ] {
        let (_dir, path) = scratch(&format!(
            r#"{{ "slots": {}, "plugs": "{}", "ciphertext": "abc",
                 "passes": [ {{ "pass": "measure", "measure": {{ "measure": "ic" }} }} ] }}"#,
            slots, plugs
        ));
        let result = QueryFile::load_from_file(&path)
            .unwrap()
            .resolve(path.parent().unwrap());
        assert!(result.is_err(), "accepted slots {} with plugs {:?}", slots, plugs);
    }
}

#[test]
fn test_pass_query_round_trip_through_json() {
    let pass = PassQuery::HillClimb {
        early: MeasureQuery::Ic { order: 1 },
        late: Some(MeasureQuery::Ngram {
            file: "english-2.tsv".into(),
            order: 2,
        }),
        min_plugs: None,
        max_plugs: Some(8),
    };
    let json = serde_json::to_string(&pass).unwrap();
    assert!(json.contains(r#""pass":"hill_climb""#));
    assert_eq!(serde_json::from_str::<PassQuery>(&json).unwrap(), pass);
}

// --- WHEEL DATABASE ---

#[test]
fn test_wheel_database_matches_builtin() {
    let db = WheelDatabase::load_from_file(data_path("wheels.json")).unwrap();
    let catalog = db.into_catalog().unwrap();
    let builtin = WheelCatalog::builtin().unwrap();
    assert_eq!(catalog.len(), 8);
    for wheel in catalog.iter() {
        assert_eq!(builtin.get(&wheel.name).unwrap(), *wheel, "wheel {} differs", wheel.name);
    }
}

#[test]
fn test_custom_wheel_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheels.json");
    fs::write(
        &path,
        r#"[
            { "name": "Shift", "wiring": "bcdefghijklmnopqrstuvwxyza", "turnover": "a-m" },
            { "name": "Swap", "wiring": "badcfehgjilknmporqtsvuxwzy", "rotating": false }
        ]"#,
    )
    .unwrap();

    let catalog = WheelDatabase::catalog(Some(&path)).unwrap();
    assert_eq!(catalog.len(), 2);
    let shift = catalog.get("Shift").unwrap();
    assert!(shift.rotating);
    assert_eq!(shift.turnover_period(), 26);
    assert_eq!(shift.wiring_period(), 1);
    assert!(catalog.get("Swap").unwrap().is_reflector());
    assert!(catalog.get("I").is_err());
}

#[test]
fn test_duplicate_or_broken_wheels_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for (i, body) in [
        r#"[ { "name": "A", "wiring": "bcdefghijklmnopqrstuvwxyza" }, { "name": "A", "wiring": "bcdefghijklmnopqrstuvwxyza" } ]"#,
        r#"[ { "name": "A", "wiring": "abc" } ]"#,
        r#"[ { "name": "A", "wiring": "aacdefghijklmnopqrstuvwxyz" } ]"#,
    ]
    .iter()
    .enumerate()
    {
        let path = dir.path().join(format!("bad-{}.json", i));
        fs::write(&path, body).unwrap();
        assert!(WheelDatabase::catalog(Some(&path)).is_err(), "accepted {}", body);
    }
}

#[test]
fn test_no_database_means_builtin() {
    let catalog = WheelDatabase::catalog(None).unwrap();
    assert_eq!(catalog.len(), WheelCatalog::builtin().unwrap().len());
}

// --- RUN PARAMETERS ---

#[test]
fn test_run_params_override_query() {
    let query = resolve(&data_path("queries/sample.json"));

    let defaults = RunParams::default().options(&query);
    assert_eq!(defaults.hold_size, 10);
    assert!(defaults.workers >= 1);

    let params = RunParams {
        workers: Some(3),
        hold: Some(4),
        batch_size: 16,
        report_interval: 0.5,
        time: None,
    };
    let options = params.options(&query);
    assert_eq!(options.workers, 3);
    assert_eq!(options.hold_size, 4);
    assert_eq!(options.batch_size, 16);
    assert_eq!(options.report_interval.as_millis(), 500);

    let mut bare = query.clone();
    bare.hold = None;
    assert_eq!(RunParams::default().options(&bare).hold_size, DEFAULT_HOLD_SIZE);
}

#[test]
fn test_prepare_attack_from_sample() {
    let params = RunParams {
        workers: Some(2),
        ..Default::default()
    };
    let attack = prepare_attack(data_path("queries/sample.json"), &params).unwrap();
    assert_eq!(attack.space.count(), 105_456);
    assert_eq!(attack.options.workers, 2);
    assert_eq!(attack.hold.capacity(), 10);
}
