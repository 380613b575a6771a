//! Heuristic portfolio tests
//!
//! Timing decorator, concurrent counters, and config-driven assembly.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use portfolio_snake::board::TailVanishRule;
use portfolio_snake::config::{Config, HeuristicConfig};
use portfolio_snake::error::EngineError;
use portfolio_snake::heuristics::{by_name, portfolio_from_config, BUILTIN_NAMES};
use portfolio_snake::portfolio::{HeuristicStats, Portfolio, WeightedHeuristic};
use portfolio_snake::snapshot::{AgentState, GameSnapshot};
use portfolio_snake::types::Coord;

fn snapshot() -> GameSnapshot {
    GameSnapshot::new(
        10,
        5,
        5,
        vec![Coord::new(0, 0)],
        vec![AgentState::new("me", 70, vec![Coord::new(2, 2), Coord::new(2, 1)])],
        "me",
        TailVanishRule::new(100, 3),
    )
    .expect("valid snapshot")
}

#[test]
fn test_evaluate_returns_raw_score_and_counts() {
    let h = WeightedHeuristic::new(2.0, "constant", |_: &GameSnapshot| 42.5);
    let snap = snapshot();

    for _ in 0..3 {
        assert_eq!(h.evaluate(&snap), 42.5);
    }

    let stats = h.get_and_reset_stats();
    assert_eq!(stats.evaluations, 3);
    assert_eq!(h.get_and_reset_stats(), HeuristicStats::default());
}

#[test]
fn test_stats_accumulate_elapsed_time() {
    let h = WeightedHeuristic::new(1.0, "slow", |_: &GameSnapshot| {
        thread::sleep(Duration::from_millis(2));
        1.0
    });
    let snap = snapshot();

    for _ in 0..5 {
        h.evaluate(&snap);
    }

    let stats = h.get_and_reset_stats();
    assert_eq!(stats.evaluations, 5);
    assert!(stats.micros >= 10_000, "got {}µs", stats.micros);
    assert!(stats.avg_micros() >= 2_000.0);

    let after = h.get_and_reset_stats();
    assert_eq!((after.micros, after.evaluations), (0, 0));
}

#[test]
fn test_concurrent_evaluations_are_all_counted() {
    let h = WeightedHeuristic::new(1.0, "constant", |_: &GameSnapshot| 1.0);
    let snap = snapshot();

    let total: f64 = (0..5_000).into_par_iter().map(|_| h.evaluate(&snap)).sum();

    assert_eq!(total, 5_000.0);
    assert_eq!(h.get_and_reset_stats().evaluations, 5_000);
}

#[test]
fn test_reset_during_evaluation_loses_nothing() {
    let h = Arc::new(WeightedHeuristic::new(1.0, "constant", |_: &GameSnapshot| 1.0));
    let snap = Arc::new(snapshot());
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let h = h.clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut seen = 0u64;
            while !done.load(Ordering::Acquire) {
                seen += h.get_and_reset_stats().evaluations;
            }
            seen
        })
    };

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let h = h.clone();
            let snap = snap.clone();
            thread::spawn(move || {
                for _ in 0..2_500 {
                    h.evaluate(&snap);
                }
            })
        })
        .collect();

    for w in writers {
        w.join().expect("writer thread");
    }
    done.store(true, Ordering::Release);

    let seen = reader.join().expect("reader thread") + h.get_and_reset_stats().evaluations;
    assert_eq!(seen, 10_000);
}

#[test]
fn test_name_weight_and_totals() {
    let portfolio = Portfolio::new(vec![
        WeightedHeuristic::new(1.5, "food", |_: &GameSnapshot| 0.0),
        WeightedHeuristic::new(0.5, "space", |_: &GameSnapshot| 0.0),
    ]);

    assert_eq!(portfolio.len(), 2);
    assert_eq!(portfolio.total_weight(), 2.0);
    assert_eq!(portfolio.heuristics()[0].name_and_weight(), "food, w=1.50");
    assert_eq!(portfolio.heuristics()[1].name(), "space");
}

#[test]
fn test_log_performance_stats_drains_counters() {
    let portfolio = Portfolio::new(vec![WeightedHeuristic::new(
        1.0,
        "constant",
        |_: &GameSnapshot| 1.0,
    )]);
    portfolio.heuristics()[0].evaluate(&snapshot());

    portfolio.log_performance_stats();
    assert_eq!(
        portfolio.heuristics()[0].get_and_reset_stats().evaluations,
        0
    );
}

#[test]
fn test_every_builtin_name_resolves() {
    let config = Config::default_hardcoded();
    for name in BUILTIN_NAMES {
        assert!(by_name(name, &config).is_some(), "{} should be registered", name);
    }
    assert!(by_name("telepathy", &config).is_none());
}

#[test]
fn test_portfolio_from_config_keeps_order_and_weights() {
    let mut config = Config::default_hardcoded();
    config.portfolio.heuristics = vec![
        HeuristicConfig {
            name: "space".to_string(),
            weight: 3.0,
        },
        HeuristicConfig {
            name: "health".to_string(),
            weight: 0.5,
        },
    ];

    let portfolio = portfolio_from_config(&config).expect("known heuristics");
    let names: Vec<&str> = portfolio.heuristics().iter().map(|h| h.name()).collect();
    assert_eq!(names, vec!["space", "health"]);
    assert_eq!(portfolio.total_weight(), 3.5);
    assert_eq!(portfolio.heuristics()[1].evaluate(&snapshot()), 70.0);
}

#[test]
fn test_unknown_heuristic_is_a_config_error() {
    let mut config = Config::default_hardcoded();
    config.portfolio.heuristics.push(HeuristicConfig {
        name: "telepathy".to_string(),
        weight: 1.0,
    });

    assert!(matches!(
        portfolio_from_config(&config),
        Err(EngineError::UnknownHeuristic(name)) if name == "telepathy"
    ));
}
