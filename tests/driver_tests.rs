// Integration tests for the headless game loop and its JSONL tick log
//
// Runs on a multi-threaded runtime with no delay between ticks and checks that the log
// holds exactly one line per move, in move order.

use std::time::Duration;

use snake_bots::bots::BotKind;
use snake_bots::debug_logger::{DebugLogger, TickRecord};
use snake_bots::driver::play_game;
use snake_bots::game::{GameSimulator, GameState};

fn temp_log_path(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("snake_bots_driver_{}_{}.jsonl", name, std::process::id()))
        .to_string_lossy()
        .into_owned()
}

async fn read_records(path: &str) -> Vec<TickRecord> {
    let contents = tokio::fs::read_to_string(path).await.unwrap();
    contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_tick_is_logged_in_order() {
    let path = temp_log_path("order");
    let logger = DebugLogger::new(true, &path).await;
    assert!(logger.is_enabled());

    let mut long_game = GameSimulator::with_seed(20, 20, BotKind::Brute, 12).unwrap();
    let first = play_game(&mut long_game, 1, Duration::ZERO, 2_000, &logger).await;

    // Odd height: the brute cycle runs off the grid
    let mut short_game = GameSimulator::with_seed(4, 3, BotKind::Brute, 12).unwrap();
    let second = play_game(&mut short_game, 2, Duration::ZERO, 2_000, &logger).await;
    assert_eq!(second.state, GameState::GameOver);

    let records = read_records(&path).await;
    let _ = tokio::fs::remove_file(&path).await;

    assert_eq!(records.len() as u64, first.moves + second.moves);

    let (game_one, game_two): (Vec<TickRecord>, Vec<TickRecord>) =
        records.into_iter().partition(|r| r.game == 1);
    for (records, summary) in [(&game_one, &first), (&game_two, &second)] {
        let move_numbers: Vec<u64> = records.iter().map(|r| r.move_number).collect();
        let expected: Vec<u64> = (1..=summary.moves).collect();
        assert_eq!(move_numbers, expected);
    }

    let last = game_two.last().unwrap();
    assert!(last.game_over);
    assert_eq!(last.food_eaten, second.food_eaten);
    assert!(game_two[..game_two.len() - 1].iter().all(|r| !r.game_over));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_log_follows_the_snake() {
    let path = temp_log_path("heads");
    let logger = DebugLogger::new(true, &path).await;

    let mut sim = GameSimulator::with_seed(6, 6, BotKind::Brute, 3).unwrap();
    play_game(&mut sim, 1, Duration::ZERO, 30, &logger).await;

    let records = read_records(&path).await;
    let _ = tokio::fs::remove_file(&path).await;

    assert_eq!(records.len(), 30);
    for pair in records.windows(2) {
        let (before, after) = (pair[0].head.unwrap(), pair[1].head.unwrap());
        assert_eq!(after, pair[1].direction.apply(before));
    }
    assert_eq!(records.last().unwrap().head, sim.head());
}
