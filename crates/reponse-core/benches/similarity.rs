use criterion::{black_box, criterion_group, criterion_main, Criterion};

use reponse_core::normalize::normalize;
use reponse_core::similarity::{best_match, similarity};

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("short_accented", |b| {
        b.iter(|| normalize(black_box("J'ai Été à l'École")))
    });

    group.bench_function("sentence", |b| {
        b.iter(|| {
            normalize(black_box(
                "  Les élèves   préfèrent étudier très tôt le matin  ",
            ))
        })
    });

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");

    group.bench_function("typo", |b| {
        b.iter(|| similarity(black_box("boujour"), black_box("bonjour")))
    });

    group.bench_function("sentence_pair", |b| {
        b.iter(|| {
            similarity(
                black_box("je voudrais un cafe s'il vous plait"),
                black_box("je voudrais un café s'il te plaît"),
            )
        })
    });

    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let variations: Vec<String> = vec![
        "salut".into(),
        "coucou".into(),
        "bonsoir".into(),
        "bonjour à tous".into(),
    ];

    c.bench_function("best_match_with_variations", |b| {
        b.iter(|| best_match(black_box("bojour"), black_box("bonjour"), black_box(&variations)))
    });
}

criterion_group!(benches, bench_normalize, bench_similarity, bench_best_match);
criterion_main!(benches);
