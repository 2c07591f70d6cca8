// Batch evaluation tool: plays many seeded games per bot in parallel and reports averages
//
// Usage:
//   cargo run --release --bin bot_stats -- [options]
//
// Options:
//   --games <n>        Games per bot (default: 100)
//   --bots <b1,b2>     Bots to evaluate (comma-separated, default: all)
//   --seed <n>         First seed; game i uses seed + i (default: 0)
//   --json             Print the report as JSON instead of a table
//   --config <path>    Path to Snake.toml (default: Snake.toml)

use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::process;

use snake_bots::bots::BotKind;
use snake_bots::config::Config;
use snake_bots::game::{GameSimulator, GameState, GameSummary};

/// Aggregated results for one bot
#[derive(Debug, Serialize)]
struct BotReport {
    bot: BotKind,
    games: usize,
    average_score: f64,
    average_moves: f64,
    moves_per_food: Option<f64>,
    best_score: u64,
    hit_move_cap: usize,
}

impl BotReport {
    fn from_summaries(bot: BotKind, summaries: &[GameSummary]) -> Self {
        let games = summaries.len();
        let total_food: u64 = summaries.iter().map(|s| s.food_eaten).sum();
        let total_moves: u64 = summaries.iter().map(|s| s.moves).sum();
        let per_game = |total: u64| {
            if games > 0 {
                total as f64 / games as f64
            } else {
                0.0
            }
        };

        BotReport {
            bot,
            games,
            average_score: per_game(total_food),
            average_moves: per_game(total_moves),
            moves_per_food: if total_food > 0 {
                Some(total_moves as f64 / total_food as f64)
            } else {
                None
            },
            best_score: summaries.iter().map(|s| s.food_eaten).max().unwrap_or(0),
            hit_move_cap: summaries
                .iter()
                .filter(|s| s.state != GameState::GameOver)
                .count(),
        }
    }
}

fn print_usage() {
    eprintln!("Snake Bot Statistics");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  bot_stats [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --games <n>        Games per bot (default: 100)");
    eprintln!("  --bots <b1,b2>     Bots to evaluate (comma-separated, default: all)");
    eprintln!("  --seed <n>         First seed (default: 0)");
    eprintln!("  --json             Print the report as JSON");
    eprintln!("  --config <path>    Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help             Show this help message");
}

fn parse_bots(s: &str) -> Result<Vec<BotKind>, String> {
    s.split(',').map(|name| name.trim().parse()).collect()
}

fn play_one(config: &Config, bot: BotKind, seed: u64) -> Result<GameSummary, String> {
    let mut sim = GameSimulator::with_seed(config.grid.width, config.grid.height, bot, seed)?;
    sim.start();
    Ok(sim.run_to_completion(config.driver.max_moves_per_game))
}

fn print_report(config: &Config, reports: &[BotReport]) {
    println!("\n═══════════════════════════════════════════════════════════════════════");
    println!(
        "                  BOT REPORT ({}x{} grid, {} move cap)",
        config.grid.width, config.grid.height, config.driver.max_moves_per_game
    );
    println!("═══════════════════════════════════════════════════════════════════════");
    println!(
        "{:<15} {:>6} {:>10} {:>12} {:>10} {:>6} {:>6}",
        "Bot", "Games", "Avg Score", "Avg Moves", "Moves/Food", "Best", "Capped"
    );
    for report in reports {
        let ratio = report
            .moves_per_food
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<15} {:>6} {:>10.1} {:>12.1} {:>10} {:>6} {:>6}",
            report.bot.name(),
            report.games,
            report.average_score,
            report.average_moves,
            ratio,
            report.best_score,
            report.hit_move_cap
        );
    }
    println!("═══════════════════════════════════════════════════════════════════════\n");
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut config_path = "Snake.toml".to_string();
    let mut games: u64 = 100;
    let mut bots: Vec<BotKind> = BotKind::ALL.to_vec();
    let mut first_seed: u64 = 0;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        let parsed: Result<(), String> = match args[i].as_str() {
            "--games" => value
                .ok_or_else(|| "--games requires a value".to_string())
                .and_then(|v| v.parse().map_err(|e| format!("Invalid game count '{}': {}", v, e)))
                .map(|n| games = n),
            "--bots" => value
                .map(String::as_str)
                .ok_or_else(|| "--bots requires a value".to_string())
                .and_then(parse_bots)
                .map(|b| bots = b),
            "--seed" => value
                .ok_or_else(|| "--seed requires a value".to_string())
                .and_then(|v| v.parse().map_err(|e| format!("Invalid seed '{}': {}", v, e)))
                .map(|s| first_seed = s),
            "--config" => value
                .ok_or_else(|| "--config requires a value".to_string())
                .map(|p| config_path = p.clone()),
            "--json" => {
                json = true;
                i += 1;
                continue;
            }
            other => Err(format!("Unknown option: {}", other)),
        };
        if let Err(e) = parsed {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
        i += 2;
    }

    let config = match Config::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut reports = Vec::with_capacity(bots.len());
    for bot in bots {
        let summaries: Result<Vec<GameSummary>, String> = (0..games)
            .into_par_iter()
            .map(|i| play_one(&config, bot, first_seed.wrapping_add(i)))
            .collect();

        match summaries {
            Ok(summaries) => reports.push(BotReport::from_summaries(bot, &summaries)),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: Failed to serialize report: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&config, &reports);
    }
}
