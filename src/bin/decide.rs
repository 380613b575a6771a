// Offline decision tool: scores a saved /move request
//
// Usage:
//   cargo run --bin decide -- <request.json> [options]
//
// Options:
//   --config <path>     Path to Snake.toml (default: Snake.toml)
//   --samples <n>       Draw n moves and print how often each was chosen
//   --seed <u64>        Seed for the sampling RNG

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::process;

use portfolio_snake::agent::SnakeAgent;
use portfolio_snake::board::TailVanishRule;
use portfolio_snake::config::Config;
use portfolio_snake::snapshot::GameSnapshot;
use portfolio_snake::types::{Direction, GameState};

struct Options {
    request_path: String,
    config_path: String,
    samples: usize,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Battlesnake Decision Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  decide <request.json> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --config <path>   Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --samples <n>     Sample n decisions and print the observed frequencies");
    eprintln!("  --seed <u64>      Seed the sampling RNG");
    eprintln!("  --help            Show this help message");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut request_path = None;
    let mut config_path = "Snake.toml".to_string();
    let mut samples = 0;
    let mut seed = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config_path = iter
                    .next()
                    .ok_or("--config requires a path")?
                    .clone();
            }
            "--samples" => {
                let raw = iter.next().ok_or("--samples requires a number")?;
                samples = raw
                    .parse()
                    .map_err(|e| format!("Invalid sample count '{}': {}", raw, e))?;
            }
            "--seed" => {
                let raw = iter.next().ok_or("--seed requires a number")?;
                seed = Some(
                    raw.parse()
                        .map_err(|e| format!("Invalid seed '{}': {}", raw, e))?,
                );
            }
            other if other.starts_with("--") => return Err(format!("Unknown option: {}", other)),
            other => request_path = Some(other.to_string()),
        }
    }

    Ok(Options {
        request_path: request_path.ok_or("Missing request file")?,
        config_path,
        samples,
        seed,
    })
}

fn run(options: Options) -> Result<(), String> {
    let config = Config::from_file(&options.config_path)?;
    let contents = fs::read_to_string(&options.request_path)
        .map_err(|e| format!("Failed to read request: {}", e))?;
    let request: GameState =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse request: {}", e))?;

    let snapshot = GameSnapshot::from_request(&request, TailVanishRule::from_config(&config))
        .map_err(|e| e.to_string())?;
    let agent = SnakeAgent::from_config(&config).map_err(|e| e.to_string())?;

    let moves: Vec<Direction> = snapshot
        .you()
        .considered_moves(config.agent.default_move)
        .into_iter()
        .map(|m| m.direction)
        .collect();

    println!("═══════════════════════════════════════════════════════════");
    println!("Decision for turn {} (snake '{}')", snapshot.turn(), snapshot.you().id());
    println!("═══════════════════════════════════════════════════════════");
    println!("Considered moves: {:?}", moves);
    println!();

    if moves.len() > 1 {
        let evaluation = agent
            .evaluate_moves(&snapshot, &moves)
            .map_err(|e| e.to_string())?;

        for (h, scores) in agent
            .portfolio()
            .heuristics()
            .iter()
            .zip(&evaluation.heuristic_scores)
        {
            print!("{:>20}:", h.name_and_weight());
            for (m, s) in moves.iter().zip(scores) {
                print!("  {}={:7.2}", m, s.raw);
            }
            println!();
        }
        print!("{:>20}:", "normalized");
        for (m, v) in moves.iter().zip(&evaluation.normalized) {
            print!("  {}={:7.2}", m, v);
        }
        println!();
        println!();
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let decision = agent
        .choose_move_with_rng(&snapshot, &mut rng)
        .map_err(|e| e.to_string())?;
    for (m, p) in &decision.probabilities {
        println!("  P({:>5}) = {:5.1}%", m.as_str(), p * 100.0);
    }
    println!("Chosen: {} ({})", decision.direction, decision.shout);

    if options.samples > 0 {
        let mut counts: HashMap<Direction, usize> = HashMap::new();
        for _ in 0..options.samples {
            let d = agent
                .choose_move_with_rng(&snapshot, &mut rng)
                .map_err(|e| e.to_string())?;
            *counts.entry(d.direction).or_default() += 1;
        }
        println!();
        println!("Observed over {} samples:", options.samples);
        for m in &moves {
            let n = counts.get(m).copied().unwrap_or(0);
            println!(
                "  {:>5}: {:6} ({:5.1}%)",
                m.as_str(),
                n,
                100.0 * n as f64 / options.samples as f64
            );
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") || args.len() < 2 {
        print_usage();
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
