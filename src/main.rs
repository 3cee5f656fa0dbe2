use std::fs;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ratingfit::aggregate::{AggregationMode, EncounterSource, InMemoryGameLog};
use ratingfit::args::Args;
use ratingfit::conductor::{self, FitContext};
use ratingfit::schedule::FitConfig;
use ratingfit::types::{FitScalars, PlayerMeta};
use ratingfit::utils::progress_utils::IndicatifObserver;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let players = read_player_table(&args.players).expect("failed to read player table");
    let names: Vec<String> = players.iter().map(|(name, ..)| name.clone()).collect();
    let initial_ratings: Vec<f64> = players.iter().map(|(_, rating, _)| *rating).collect();

    let mut anchor = 0usize;
    let mut anchor_use = false;
    let mut player_meta = Vec::with_capacity(players.len());
    for (i, (name, _, is_anchor)) in players.iter().enumerate() {
        let mut meta = PlayerMeta::normal(name.clone());
        if *is_anchor {
            meta.prefed = true;
            anchor = i;
            anchor_use = true;
        }
        player_meta.push(meta);
    }

    let games = read_encounter_table(&args.encounters).expect("failed to read encounter table");
    let flagged = vec![false; player_meta.len()];
    let source = InMemoryGameLog::new(games, flagged);
    let enc = source.aggregate(AggregationMode::NoFlagged);

    let scalars = FitScalars {
        white_advantage: 0.0,
        draw_rate: 0.33,
        beta: 1.0 / 200.0,
        general_average: 2000.0,
        anchor,
        anchor_use,
        multiple_anchors_present: false,
    };

    let mut ctx = FitContext::new(player_meta, initial_ratings, enc, scalars).expect("failed to allocate fit scratch");
    let config = FitConfig::default();

    let mut observer = IndicatifObserver::new(&config.schedule);
    let outcome = conductor::run(&mut ctx, &source, &config, &mut observer).expect("fit failed");

    if args.quiet {
        println!(
            "{}",
            serde_json::json!({
                "n_enc": outcome.n_enc,
                "white_advantage": outcome.white_advantage,
                "draw_rate": outcome.draw_rate,
                "ratings": names.iter().cloned().zip(ctx.ratingof.iter().copied()).collect::<Vec<_>>(),
            })
        );
    } else {
        println!("White advantage: {:.2}", outcome.white_advantage);
        println!("Draw rate: {:.4}", outcome.draw_rate);
        println!("Encounters: {}", outcome.n_enc);
        for (name, rating) in names.iter().zip(ctx.ratingof.iter()) {
            println!("{name:>20}  {rating:.1}");
        }
    }
}

/// Reads `name rating anchor` rows, one per line, whitespace-separated.
fn read_player_table(path: &Path) -> std::io::Result<Vec<(String, f64, bool)>> {
    let contents = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let name = fields.next().unwrap_or_default().to_string();
        let rating: f64 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(2000.0);
        let anchor: bool = fields.next().map(|f| f == "1").unwrap_or(false);
        rows.push((name, rating, anchor));
    }
    Ok(rows)
}

/// Reads `white black score` rows, one per line, whitespace-separated,
/// where `score` is `1`, `0.5`, or `0`.
fn read_encounter_table(path: &Path) -> std::io::Result<Vec<(usize, usize, f64)>> {
    let contents = fs::read_to_string(path)?;
    let mut games = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let wh: usize = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
        let bl: usize = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
        let score: f64 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0.5);
        games.push((wh, bl, score));
    }
    Ok(games)
}
