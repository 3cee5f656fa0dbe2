use criterion::{criterion_group, criterion_main, Criterion};

use ratingfit::aggregate::{AggregationMode, EncounterSource, InMemoryGameLog};
use ratingfit::kernel::xpect;
use ratingfit::observer::NullObserver;
use ratingfit::{run, FitConfig, FitContext, FitScalars, PlayerMeta};

fn round_robin_log(n_players: usize, beta: f64) -> InMemoryGameLog {
    let truth: Vec<f64> = (0..n_players).map(|i| 1800.0 + 40.0 * i as f64).collect();
    let mut games = Vec::new();
    for i in 0..n_players {
        for j in 0..n_players {
            if i == j {
                continue;
            }
            let f = xpect(truth[i], truth[j], beta);
            let played = 20u32;
            let w = (f * played as f64).round() as u32;
            for _ in 0..w {
                games.push((i, j, 1.0));
            }
            for _ in 0..(played - w) {
                games.push((i, j, 0.0));
            }
        }
    }
    InMemoryGameLog::new(games, vec![false; n_players])
}

fn fit_round_robin(n_players: usize) {
    let beta = 1.0 / 200.0;
    let source = round_robin_log(n_players, beta);
    let enc = source.aggregate(AggregationMode::NoFlagged);

    let mut players: Vec<_> = (0..n_players).map(|i| PlayerMeta::normal(format!("p{i}"))).collect();
    players[0].prefed = true;

    let scalars = FitScalars {
        white_advantage: 0.0,
        draw_rate: 0.33,
        beta,
        general_average: 2000.0,
        anchor: 0,
        anchor_use: true,
        multiple_anchors_present: false,
    };

    let mut ctx = FitContext::new(players, vec![2000.0; n_players], enc, scalars).expect("valid context");
    let mut config = FitConfig::default();
    config.schedule.outer_rounds = 2;
    config.adjust_white_advantage = false;
    config.adjust_draw_rate = false;

    let mut observer = NullObserver;
    run(&mut ctx, &source, &config, &mut observer).expect("fit converges");
}

fn group_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("conductor-fit");
    group.sample_size(10);
    group.bench_function("round-robin: n=10", |b| b.iter(|| fit_round_robin(10)));
    group.bench_function("round-robin: n=25", |b| b.iter(|| fit_round_robin(25)));
    group.bench_function("round-robin: n=50", |b| b.iter(|| fit_round_robin(50)));
    group.finish();
}

criterion_group!(benches, group_call);
criterion_main!(benches);
