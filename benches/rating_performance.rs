//! Performance benchmarks for rating calculations and set recording

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gametracker::config::RatingConfig;
use gametracker::rating::{resolve_set_winner, EloCalculator, Outcome, RatingCalculator};
use gametracker::storage::InMemoryStore;
use gametracker::tracker::{MatchRecorder, PlayerDirectory, RankingAggregator};
use gametracker::types::{GameEntry, Score, SetSubmission};
use std::sync::Arc;

fn bench_rating_calculations(c: &mut Criterion) {
    let calculator = EloCalculator::new(&RatingConfig::default()).unwrap();

    c.bench_function("elo_update_single_game", |b| {
        b.iter(|| {
            black_box(calculator.update_ratings(
                black_box(1016.0),
                black_box(984.0),
                Outcome::AWins,
            ))
        })
    });

    c.bench_function("elo_update_three_game_set", |b| {
        b.iter(|| {
            let mut ratings = (black_box(0.0), black_box(0.0));
            for outcome in [Outcome::AWins, Outcome::BWins, Outcome::AWins] {
                ratings = calculator
                    .update_ratings(ratings.0, ratings.1, outcome)
                    .unwrap();
            }
            black_box(ratings)
        })
    });
}

fn bench_outcome_resolution(c: &mut Criterion) {
    let winners = ["Alice", "Bob", "Alice"];

    c.bench_function("resolve_set_winner", |b| {
        b.iter(|| black_box(resolve_set_winner(black_box(&winners))))
    });
}

fn bench_record_and_rank(c: &mut Criterion) {
    let store = Arc::new(InMemoryStore::new());
    let players = PlayerDirectory::new(store.clone(), 0.0);
    for i in 0..20 {
        players
            .create_player(&format!("player_{}", i), None, None)
            .unwrap();
    }

    let recorder = MatchRecorder::new(
        store.clone(),
        Arc::new(EloCalculator::default()),
        players,
    );
    let rankings = RankingAggregator::new(store);

    let entry = |winner: &str| GameEntry {
        winner: winner.to_string(),
        server: winner.to_string(),
        score: Score::new(21, 17),
    };
    let submission = SetSubmission {
        player_one: "player_0".to_string(),
        player_two: "player_1".to_string(),
        games: vec![entry("player_0"), entry("player_1"), entry("player_0")],
    };

    c.bench_function("record_set_memory_store", |b| {
        b.iter(|| black_box(recorder.record_set(&submission)))
    });

    c.bench_function("compute_rankings_20_players", |b| {
        b.iter(|| black_box(rankings.compute_rankings()))
    });
}

criterion_group!(
    benches,
    bench_rating_calculations,
    bench_outcome_resolution,
    bench_record_and_rank
);
criterion_main!(benches);
