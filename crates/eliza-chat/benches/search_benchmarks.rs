//! Benchmarks for the search/undo cycle and reply generation.
//!
//! A search copies the whole log into the backup and rebuilds the visible
//! list, so its cost grows with the conversation. Set `BENCH_FULL_SCALE`
//! to run against a long session instead of the CI-sized one.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eliza_chat::{ConversationController, SearchStrategy};
use eliza_core::{ResponseData, VerbForms};

const CI_MESSAGE_COUNT: usize = 1_000;
const FULL_SCALE_MESSAGE_COUNT: usize = 50_000;

fn message_count() -> usize {
    if std::env::var("BENCH_FULL_SCALE").is_ok() {
        FULL_SCALE_MESSAGE_COUNT
    } else {
        CI_MESSAGE_COUNT
    }
}

fn response_data() -> ResponseData {
    let verbs = [("suis", "êtes"), ("vais", "allez"), ("dis", "dites")]
        .iter()
        .map(|(f, s)| VerbForms {
            first_singular: f.to_string(),
            second_plural: s.to_string(),
        })
        .collect();
    ResponseData {
        verbs,
        fillers: vec![
            "Je vois.".to_string(),
            "Continuez, je vous écoute.".to_string(),
        ],
    }
}

/// Generate a varied user line.
fn generate_line(index: usize) -> String {
    match index % 4 {
        0 => format!("Je pense à mon chien numéro {}.", index),
        1 => format!("Il fait beau aujourd'hui {}", index),
        2 => format!("Pourquoi le ciel est-il bleu {} ?", index),
        _ => format!("Je suis allé au marché {} fois", index),
    }
}

/// Controller holding `count` messages (user lines and replies).
fn build_session(count: usize) -> ConversationController {
    let mut controller = ConversationController::from_response_data(response_data(), Some(42))
        .expect("controller from bench data");
    controller.greet();
    for i in 0..count / 2 {
        controller.submit_message(&generate_line(i));
    }
    controller
}

fn bench_search_undo(c: &mut Criterion) {
    let count = message_count();
    let mut controller = build_session(count);

    let mut group = c.benchmark_group("search_undo");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(5));

    let cases = [
        (SearchStrategy::Substring, "marché 1"),
        (SearchStrategy::WholeWord, "chien"),
        (SearchStrategy::Regex, r"numéro \d+7\."),
    ];
    for (strategy, query) in cases {
        group.bench_function(format!("{}_{}msgs", strategy.name(), count), |b| {
            b.iter(|| {
                let found = controller
                    .run_search(strategy, black_box(query))
                    .expect("search failed");
                controller.undo_search();
                found
            });
        });
    }

    group.finish();
}

fn bench_reply_generation(c: &mut Criterion) {
    let mut controller = build_session(0);

    let mut group = c.benchmark_group("reply_generation");
    group.bench_function("reflection", |b| {
        b.iter(|| {
            controller
                .processor_mut()
                .generate_reply(black_box("Je suis content de ma journée avec moi-même."))
        });
    });
    group.bench_function("filler_or_fallback", |b| {
        b.iter(|| {
            controller
                .processor_mut()
                .generate_reply(black_box("Il fait beau"))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_search_undo, bench_reply_generation);
criterion_main!(benches);
