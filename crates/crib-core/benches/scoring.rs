use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crib_core::analysis::{AnalyzerConfig, DiscardAnalyzer};
use crib_core::model::Hand;
use crib_core::scoring::score_hand;

fn score_hand_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_hand");
    for text in ["5H 5C 5S JD 5D", "6C 4D 6D 4S 5D", "AH 8H 3H JH TH"] {
        let hand: Hand = text.parse().expect("valid hand");
        group.bench_function(text, |b| {
            b.iter(|| score_hand(black_box(&hand), black_box(true)))
        });
    }
    group.finish();
}

fn analyze_bench(c: &mut Criterion) {
    let hand: Hand = "5H 5C JD 4S 6C KH".parse().expect("valid hand");
    let mut group = c.benchmark_group("discard_analysis");
    group.sample_size(10);
    for parallel in [false, true] {
        let analyzer = DiscardAnalyzer::new(AnalyzerConfig {
            parallel,
            ..AnalyzerConfig::default()
        });
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| b.iter(|| analyzer.analyze(black_box(&hand))));
    }
    group.finish();
}

criterion_group!(benches, score_hand_bench, analyze_bench);
criterion_main!(benches);
