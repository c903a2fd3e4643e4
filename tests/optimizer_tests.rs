mod common;

use common::{army_key, encrypt_text, english_bigrams, PLAINTEXT, TRUE_PLUGS};
use rotorforge::attack::{run_passes, Pass};
use rotorforge::core_types::Message;
use rotorforge::machine::{Plugboard, Scrambler};
use rotorforge::optimizer::actions::{classify, run_table, BOTH_FREE, BOTH_PLUGGED, ONE_PLUGGED};
use rotorforge::optimizer::{HillClimb, Probe, Reswap};
use rotorforge::scorer::{Evaluator, Measure, Trie};
use std::sync::Arc;

/// Scrambler of the true mechanical key and the plugged ciphertext.
fn setup(plugs: &str) -> (Scrambler, Message) {
    let key = army_key("II I III", "aaaaa", "akfxa", plugs);
    let ciphertext = encrypt_text(&key, PLAINTEXT);
    let mut mechanical = key.clone();
    mechanical.plugboard = Plugboard::identity();
    let mut scrambler = Scrambler::new(ciphertext.len()).unwrap();
    scrambler.generate(&mut mechanical);
    (scrambler, ciphertext)
}

#[test]
fn test_classify_cases() {
    let pb = Plugboard::from_pairs("ab cd").unwrap();
    assert!(classify(&pb, 0, 1).is_none());
    assert_eq!(classify(&pb, 4, 5).unwrap().0, BOTH_FREE);
    assert_eq!(classify(&pb, 0, 5).unwrap(), (ONE_PLUGGED, [5, 5, 0, 1]));
    assert_eq!(classify(&pb, 4, 2).unwrap(), (ONE_PLUGGED, [4, 4, 2, 3]));
    assert_eq!(classify(&pb, 0, 2).unwrap(), (BOTH_PLUGGED, [0, 1, 2, 3]));
}

#[test]
fn test_tables_restore_the_board() {
    let pb = Plugboard::from_pairs("ab cd ef").unwrap();
    for i in 0..26u8 {
        for k in (i + 1)..26u8 {
            let Some((table, cells)) = classify(&pb, i, k) else {
                continue;
            };
            let mut board = pb;
            let kept = run_table(table, cells, &mut board, f64::INFINITY, |b, _| {
                assert!(b.is_involution());
                Some(0.0)
            });
            assert!(kept.is_none());
            assert_eq!(board, pb);
        }
    }
}

#[test]
fn test_replays_best_checkpoint() {
    let pb = Plugboard::from_pairs("ac bd").unwrap();
    let (table, cells) = classify(&pb, 0, 1).unwrap();
    let mut board = pb;
    let target = Plugboard::from_pairs("ad bc").unwrap();
    let kept = run_table(table, cells, &mut board, 0.0, |b, _| {
        Some(if *b == target { 5.0 } else { 1.0 })
    });
    assert_eq!(kept, Some(5.0));
    assert_eq!(board, target);
}

#[test]
fn test_hill_climb_recovers_plugboard() {
    let (scrambler, ciphertext) = setup("ar gk ox");
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);

    let climb = HillClimb::single(Measure::Ngram(english_bigrams()));
    let mut pb = Plugboard::identity();
    climb.run(&mut pb, &mut probe, None);
    assert_eq!(pb, Plugboard::from_pairs("ar gk ox").unwrap());
}

#[test]
fn test_two_measure_climb_recovers_plugboard() {
    let (scrambler, ciphertext) = setup(TRUE_PLUGS);
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);

    let climb = HillClimb::new(
        Measure::index_of_coincidence(1).unwrap(),
        Measure::Ngram(english_bigrams()),
    );
    let mut pb = Plugboard::identity();
    let score = climb.run(&mut pb, &mut probe, None);

    assert_eq!(pb, Plugboard::from_pairs(TRUE_PLUGS).unwrap());
    let expected = probe.score(&climb.late, &pb);
    assert!((score - expected).abs() < 1e-12);
}

#[test]
fn test_sweeps_never_regress() {
    let (scrambler, ciphertext) = setup(TRUE_PLUGS);
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);

    for measure in [
        Measure::index_of_coincidence(1).unwrap(),
        Measure::entropy(1).unwrap(),
        Measure::Ngram(english_bigrams()),
    ] {
        let climb = HillClimb::single(measure);
        let mut pb = Plugboard::identity();
        let mut standing = climb.start(&pb, &mut probe, None);
        let mut last = standing.score;
        let mut sweeps = 0;
        while climb.sweep(&mut pb, &mut probe, &mut standing) {
            assert!(standing.score > last);
            assert!(pb.is_involution());
            last = standing.score;
            sweeps += 1;
            assert!(sweeps < 100);
        }
        assert_eq!(standing.score, last);
    }
}

#[test]
fn test_two_measure_sweeps_never_regress() {
    let (scrambler, ciphertext) = setup(TRUE_PLUGS);
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);

    let climb = HillClimb::new(
        Measure::index_of_coincidence(1).unwrap(),
        Measure::Ngram(english_bigrams()),
    );
    let mut pb = Plugboard::identity();
    let mut standing = climb.start(&pb, &mut probe, None);
    let mut last = standing;
    let mut sweeps = 0;
    while climb.sweep(&mut pb, &mut probe, &mut standing) {
        // Scores only compare within one measure; the switch happens once.
        assert!(!(last.late && !standing.late));
        if last.late == standing.late {
            assert!(standing.score > last.score);
        }
        last = standing;
        sweeps += 1;
        assert!(sweeps < 100);
    }
    assert!(standing.late);
    assert_eq!(pb, Plugboard::from_pairs(TRUE_PLUGS).unwrap());
}

#[test]
fn test_climb_settles_when_measures_disagree() {
    let (scrambler, ciphertext) = setup("");
    let swapped = Plugboard::from_pairs("ab").unwrap();
    let mut under_swap = Vec::new();
    scrambler.decrypt_into(&swapped, &ciphertext, &mut under_swap);

    // `early` only rewards the board with cable ab, `late` only the empty board.
    let crib = |letters: Vec<u8>| {
        let word = Message::from_letters(letters).unwrap();
        Measure::Trie(Arc::new(Trie::from_words(&[(word, 100.0)]).unwrap()))
    };
    let mut climb = HillClimb::new(
        crib(under_swap),
        crib(Message::from_text(PLAINTEXT).into_letters()),
    );
    climb.min_plugs = 1;

    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);
    let mut pb = Plugboard::identity();
    let mut standing = climb.start(&pb, &mut probe, None);
    let mut sweeps = 0;
    while climb.sweep(&mut pb, &mut probe, &mut standing) {
        sweeps += 1;
        assert!(sweeps < 10, "climb keeps alternating, board {}", pb);
    }

    assert!(standing.late);
    assert_eq!(pb, Plugboard::identity());
    assert_eq!(standing.score, 100.0);
    assert_eq!(climb.run(&mut Plugboard::identity(), &mut probe, None), 100.0);
}

#[test]
fn test_max_plugs_is_respected() {
    let (scrambler, ciphertext) = setup(TRUE_PLUGS);
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);

    let mut climb = HillClimb::single(Measure::Ngram(english_bigrams()));
    climb.max_plugs = 3;
    let mut pb = Plugboard::identity();
    climb.run(&mut pb, &mut probe, None);
    assert!(pb.plug_count() <= 3);
    assert!(pb.is_involution());
}

#[test]
fn test_reswap_moves_a_misplaced_end() {
    let (scrambler, ciphertext) = setup(TRUE_PLUGS);
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);

    let measure = Measure::Ngram(english_bigrams());
    // One cable has its 'x' end on 'z' instead.
    let mut pb = Plugboard::from_pairs("ar gk oz bt lp mu").unwrap();
    let before = probe.score(&measure, &pb);
    let after = Reswap::new(measure).run(&mut pb, &mut probe, None);

    assert!(after > before);
    assert!(pb.is_involution());
    assert_eq!(pb, Plugboard::from_pairs(TRUE_PLUGS).unwrap());
}

#[test]
fn test_pass_pipeline_reuses_scores() {
    let (scrambler, ciphertext) = setup(TRUE_PLUGS);
    let mut evaluator = Evaluator::new(ciphertext.len()).unwrap();
    let bigrams = Measure::Ngram(english_bigrams());
    let passes = vec![
        Pass::HillClimb(HillClimb::new(Measure::index_of_coincidence(1).unwrap(), bigrams.clone())),
        Pass::Reswap(Reswap::new(bigrams.clone())),
        Pass::Measure(bigrams.clone()),
    ];

    let mut pb = Plugboard::identity();
    let score = {
        let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);
        run_passes(&passes, &mut pb, &mut probe)
    };
    assert_eq!(pb, Plugboard::from_pairs(TRUE_PLUGS).unwrap());

    // The final measure pass takes the reswap score over without decrypting.
    let decrypts = evaluator.take_decrypts();
    let mut probe = Probe::new(&scrambler, &ciphertext, &mut evaluator);
    assert!((probe.score(&bigrams, &pb) - score).abs() < 1e-12);
    assert!(decrypts > 0);
}
