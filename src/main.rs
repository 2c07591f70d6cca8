// Headless driver: plays games with one bot, pausing between ticks
//
// Usage:
//   cargo run -- [options]
//
// Options:
//   --bot <name>       Bot to play with (default: from Snake.toml)
//   --games <n>        Number of games to play (default: from Snake.toml)
//   --delay <ms>       Delay between ticks, capped at the configured maximum
//   --seed <n>         Seed for reproducible games
//   --config <path>    Path to Snake.toml (default: Snake.toml)

use log::info;
use std::env;
use std::process;
use std::time::Duration;

use snake_bots::bots::BotKind;
use snake_bots::config::Config;
use snake_bots::debug_logger::DebugLogger;
use snake_bots::driver::play_game;
use snake_bots::game::GameSimulator;

struct Options {
    /// Explicit config file; `None` means Snake.toml, or the defaults when it is missing
    config_path: Option<String>,
    bot: Option<BotKind>,
    games: Option<usize>,
    delay_ms: Option<u64>,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Snake Bots");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  snake-bots [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --bot <name>       Bot to play with: spacer, greedy-tail, greedy, brute, random");
    eprintln!("  --games <n>        Number of games to play");
    eprintln!("  --delay <ms>       Delay between ticks in milliseconds");
    eprintln!("  --seed <n>         Seed for reproducible games");
    eprintln!("  --config <path>    Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help             Show this help message");
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| format!("{} requires a value", flag))?;
    value
        .parse::<T>()
        .map_err(|e| format!("Invalid value '{}' for {}: {}", value, flag, e))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: None,
        bot: None,
        games: None,
        delay_ms: None,
        seed: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bot" => {
                let name = args.get(i + 1).ok_or("--bot requires a value")?;
                options.bot = Some(name.parse()?);
                i += 1;
            }
            "--games" => {
                options.games = Some(parse_number("--games", args.get(i + 1))?);
                i += 1;
            }
            "--delay" => {
                options.delay_ms = Some(parse_number("--delay", args.get(i + 1))?);
                i += 1;
            }
            "--seed" => {
                options.seed = Some(parse_number("--seed", args.get(i + 1))?);
                i += 1;
            }
            "--config" => {
                options.config_path = Some(
                    args.get(i + 1)
                        .ok_or("--config requires a value")?
                        .clone(),
                );
                i += 1;
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(0);
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let loaded = match &options.config_path {
        Some(path) => Config::from_file(path),
        None => Config::load_or_default(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut sim = match GameSimulator::from_config(&config, options.seed) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Some(bot) = options.bot {
        if let Err(e) = sim.select_bot(bot) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let delay = Duration::from_millis(
        config
            .timing
            .clamp_delay_ms(options.delay_ms.unwrap_or(config.timing.default_tick_delay_ms)),
    );
    let games = options.games.unwrap_or(config.driver.games);
    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;

    info!(
        "Playing {} game(s) with {} on a {}x{} grid ({}ms per tick)",
        games,
        sim.bot_kind(),
        sim.width(),
        sim.height(),
        delay.as_millis()
    );

    for game in 1..=games {
        let summary = play_game(
            &mut sim,
            game as u32,
            delay,
            config.driver.max_moves_per_game,
            &logger,
        )
        .await;

        let ratio = summary
            .moves_per_food()
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "n/a".to_string());
        info!(
            "Game {}: Moves: {} Score: {} (Ratio: {})",
            game, summary.moves, summary.food_eaten, ratio
        );
    }
}
