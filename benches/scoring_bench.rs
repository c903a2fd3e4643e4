use criterion::{criterion_group, criterion_main, Criterion};
use rotorforge::core_types::Message;
use rotorforge::machine::{Key, Mechanism, Plugboard, Scrambler, WheelCatalog};
use rotorforge::optimizer::{HillClimb, Probe};
use rotorforge::scorer::loader::load_ngrams_file;
use rotorforge::scorer::{Evaluator, Measure, NgramTable};
use std::hint::black_box;
use std::path::PathBuf;
use std::sync::Arc;

const TEXT: &str = "the weather report for the northern sector indicates fog and light rain until noon \
     all units will hold their present positions and await further orders from headquarters";

fn setup_key(plugs: &str) -> Key {
    let catalog = WheelCatalog::builtin().expect("Failed to build catalog");
    Key::assemble(
        Mechanism::Stepping,
        catalog
            .resolve_list("UKW-B II I III ETW-ABC")
            .expect("Unknown wheel"),
        "aaaaa",
        "akfxa",
        Plugboard::from_pairs(plugs).expect("Bad plugboard"),
    )
    .expect("Failed to assemble key")
}

fn bigrams() -> Arc<NgramTable> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/ngrams/english-2.tsv");
    let entries = load_ngrams_file(path, 2).expect("Failed to load bigrams");
    Arc::new(NgramTable::from_entries(2, &entries).expect("Failed to build table"))
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut key = setup_key("ar gk ox bt lp mu");
    let ciphertext = key.encrypt(&Message::from_text(TEXT));
    key.plugboard = Plugboard::identity();

    let mut scrambler = Scrambler::new(ciphertext.len()).expect("Failed to allocate scrambler");
    c.bench_function("scrambler generate (168 letters)", |b| {
        b.iter(|| scrambler.generate(black_box(&mut key)))
    });

    let table = bigrams();
    c.bench_function("bigram score (168 letters)", |b| {
        b.iter(|| table.score(black_box(&ciphertext)))
    });

    let climb = HillClimb::new(
        Measure::index_of_coincidence(1).expect("Bad order"),
        Measure::Ngram(Arc::clone(&table)),
    );
    let mut evaluator = Evaluator::new(ciphertext.len()).expect("Failed to allocate evaluator");
    c.bench_function("hill climb from empty board", |b| {
        b.iter(|| {
            let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);
            let mut pb = Plugboard::identity();
            climb.run(black_box(&mut pb), &mut probe, None)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
