use std::collections::{HashMap, HashSet};

use wordcount_pipeline::common::{Event, RunLimits};
use wordcount_pipeline::error::PipelineError;
use wordcount_pipeline::mr::ParallelWordCount;
use wordcount_pipeline::report::RunReport;
use wordcount_pipeline::table::OverflowKind;

fn run(input: &str) -> RunReport {
    ParallelWordCount::default().run(input).expect("run failed")
}

fn counts(report: &RunReport) -> HashMap<String, usize> {
    report.output.entries().iter().cloned().collect()
}

#[test]
fn counts_repeated_words() {
    let report = run("apple dell hp lenovo apple dell hp lenovo");
    let totals = counts(&report);
    assert_eq!(totals["apple"], 2);
    assert_eq!(totals["dell"], 2);
    assert_eq!(totals["hp"], 2);
    assert_eq!(totals["lenovo"], 2);
    assert_eq!(totals.len(), 4);
}

#[test]
fn punctuation_is_stripped_before_counting() {
    let report = run("apple, dell. hp: lenovo, apple. dell");
    let totals = counts(&report);
    assert_eq!(totals["apple"], 2);
    assert_eq!(totals["dell"], 2);
    assert_eq!(totals["hp"], 1);
    assert_eq!(totals["lenovo"], 1);
    assert_eq!(totals.len(), 4);
}

#[test]
fn case_variants_share_one_key() {
    let report = run("APPLE Dell HP lenovo Apple DELL hp LENOVO");
    let totals = counts(&report);
    assert_eq!(totals["apple"], 2);
    assert_eq!(totals["dell"], 2);
    assert_eq!(totals["hp"], 2);
    assert_eq!(totals["lenovo"], 2);
    assert_eq!(totals.len(), 4);
}

#[test]
fn empty_input_produces_empty_successful_run() {
    let report = run("");
    assert!(report.output.is_empty());
    assert!(report.overflows.is_empty());
    assert!(report.events.is_empty());

    let rendered = report.render();
    assert!(rendered.contains("Final Output:"));
    assert!(rendered.contains("Key"));
}

#[test]
fn batch_of_five_hundred_words_reduces_to_four_keys() {
    let mut words = Vec::new();
    words.extend(std::iter::repeat("apple").take(100));
    words.extend(std::iter::repeat("DELL").take(50));
    words.extend(std::iter::repeat("HP").take(100));
    words.extend(std::iter::repeat("Lenovo").take(250));
    let input = words.join(" ");

    let report = run(&input);
    let totals = counts(&report);
    assert_eq!(totals["apple"], 100);
    assert_eq!(totals["dell"], 50);
    assert_eq!(totals["hp"], 100);
    assert_eq!(totals["lenovo"], 250);
    assert_eq!(report.output.total(), 500);

    // 500 words stay on the 3-mapper floor
    let completions = report
        .events
        .iter()
        .filter(|event| matches!(event, Event::MapperCompleted { .. }))
        .count();
    assert_eq!(completions, 3);
}

#[test]
fn output_total_matches_normalized_token_count() {
    // "!!!" normalizes to nothing, the other six tokens survive
    let report = run("apple! dell@ hp# !!! apple% dell^ lenovo");
    assert_eq!(report.output.total(), 6);
}

#[test]
fn shuffle_view_is_sorted() {
    let report = run("lenovo hp dell apple lenovo hp");
    let keys: Vec<&str> = report
        .shuffle_view
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, vec!["apple", "dell", "hp", "lenovo"]);
}

#[test]
fn repeated_runs_are_deterministic() {
    let input = "apple dell apple dell apple dell hp lenovo hp";
    let baseline = {
        let mut entries: Vec<_> = counts(&run(input)).into_iter().collect();
        entries.sort();
        entries
    };
    for _ in 0..20 {
        let mut entries: Vec<_> = counts(&run(input)).into_iter().collect();
        entries.sort();
        assert_eq!(entries, baseline);
    }
}

#[test]
fn every_worker_signals_completion_once() {
    let report = run("apple dell hp lenovo apple dell hp lenovo");

    let mappers_done: HashSet<usize> = report
        .events
        .iter()
        .filter_map(|event| match event {
            Event::MapperCompleted { mapper } => Some(*mapper),
            _ => None,
        })
        .collect();
    assert_eq!(mappers_done, HashSet::from([0, 1, 2]));

    let shuffles = report
        .events
        .iter()
        .filter(|event| matches!(event, Event::ShuffleCompleted))
        .count();
    assert_eq!(shuffles, 1);

    // each distinct key is inserted exactly once, whatever the interleaving
    let inserted: Vec<&str> = report
        .events
        .iter()
        .filter_map(|event| match event {
            Event::KeyInserted { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(inserted.len(), 4);
    let inserted: HashSet<&str> = inserted.into_iter().collect();
    assert_eq!(inserted, HashSet::from(["apple", "dell", "hp", "lenovo"]));
}

#[test]
fn per_key_capacity_overflow_is_reported() {
    let limits = RunLimits {
        max_occurrences_per_key: 2,
        ..RunLimits::default()
    };
    let report = ParallelWordCount::new(limits)
        .run("apple apple apple apple apple")
        .expect("run failed");

    assert_eq!(report.output.get("apple"), Some(2));
    assert_eq!(report.overflows.len(), 3);
    for overflow in &report.overflows {
        assert_eq!(overflow.kind, OverflowKind::KeyOccurrences);
        assert_eq!(overflow.key, "apple");
    }
    // accepted plus rejected accounts for every token
    assert_eq!(report.output.total() + report.overflows.len(), 5);
}

#[test]
fn distinct_key_capacity_overflow_is_reported() {
    let limits = RunLimits {
        max_distinct_keys: 2,
        ..RunLimits::default()
    };
    let report = ParallelWordCount::new(limits)
        .run("alpha beta gamma delta")
        .expect("run failed");

    // which two keys land first depends on scheduling; the counts do not
    assert_eq!(report.output.len(), 2);
    assert_eq!(report.output.total(), 2);
    assert_eq!(report.overflows.len(), 2);
    for overflow in &report.overflows {
        assert_eq!(overflow.kind, OverflowKind::DistinctKeys);
    }
}

#[test]
fn oversized_input_is_rejected_before_workers_start() {
    let limits = RunLimits {
        max_input_len: 10,
        ..RunLimits::default()
    };
    let err = ParallelWordCount::new(limits)
        .run("this input is far too long")
        .unwrap_err();
    assert!(matches!(err, PipelineError::InputTooLarge { max: 10, .. }));
}

#[test]
fn oversized_token_is_rejected_before_workers_start() {
    let limits = RunLimits {
        max_token_len: 4,
        ..RunLimits::default()
    };
    let err = ParallelWordCount::new(limits)
        .run("ok but lengthy")
        .unwrap_err();
    assert!(matches!(err, PipelineError::TokenTooLong { len: 7, max: 4 }));
}
