// Headless game loop shared by the driver binary and its tests

use log::info;
use std::time::Duration;

use crate::debug_logger::{DebugLogger, TickRecord};
use crate::game::{GameSimulator, GameSummary};

/// Plays one game to the end (or the move cap), logging every tick
///
/// Each record is written before the next tick starts, so the log holds one line per
/// move in move order.
pub async fn play_game(
    sim: &mut GameSimulator,
    game: u32,
    delay: Duration,
    max_moves: u64,
    logger: &DebugLogger,
) -> GameSummary {
    sim.start();

    while !sim.is_game_over() && sim.moves() < max_moves {
        let outcome = sim.tick();
        if let Some(record) = TickRecord::capture(game, sim, outcome) {
            logger.log_tick(record).await;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    if !sim.is_game_over() {
        info!("Game {}: stopping at move cap {}", game, max_moves);
        sim.stop();
    }
    sim.summary()
}
