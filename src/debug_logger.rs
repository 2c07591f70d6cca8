// Debug logging module for asynchronous tick logging
//
// Each tick is appended to a JSONL file, one record per line, in the order the ticks
// were played. Writes are awaited so nothing is lost when the runtime shuts down.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::game::{GameSimulator, TickOutcome};
use crate::types::{Direction, Position};

/// Represents a single debug log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub game: u32,
    pub move_number: u64,
    pub direction: Direction,
    pub head: Option<Position>,
    pub food: Option<Position>,
    pub length: usize,
    pub food_eaten: u64,
    pub game_over: bool,
    pub timestamp: String,
}

impl TickRecord {
    /// Captures the simulator state right after `outcome`
    ///
    /// # Returns
    /// * `None` if the tick did not move the snake
    pub fn capture(game: u32, sim: &GameSimulator, outcome: TickOutcome) -> Option<Self> {
        let (direction, game_over) = match outcome {
            TickOutcome::Moved { direction, .. } => (direction, false),
            TickOutcome::Collided { direction, .. } => (direction, true),
            TickOutcome::Idle => return None,
        };

        Some(TickRecord {
            game,
            move_number: sim.moves(),
            direction,
            head: sim.head(),
            food: sim.food(),
            length: sim.body().count(),
            food_eaten: sim.food_eaten(),
            game_over,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> so clones shared between tasks never interleave lines
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one tick record and waits for the write to finish
    pub async fn log_tick(&self, record: TickRecord) {
        if !self.enabled {
            return;
        }
        Self::write_record(self.file.clone(), record).await;
    }

    async fn write_record(file_handle: Arc<Mutex<Option<File>>>, record: TickRecord) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&record) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bots::BotKind;

    fn temp_log_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("snake_bots_{}_{}.jsonl", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_capture_skips_idle_ticks() {
        let sim = GameSimulator::with_seed(5, 5, BotKind::Greedy, 1).unwrap();
        assert!(TickRecord::capture(0, &sim, TickOutcome::Idle).is_none());
    }

    #[tokio::test]
    async fn test_disabled_logger_writes_nothing() {
        let logger = DebugLogger::new(false, "should_not_exist.jsonl").await;
        assert!(!logger.is_enabled());

        let mut sim = GameSimulator::with_seed(5, 5, BotKind::Greedy, 1).unwrap();
        sim.start();
        let outcome = sim.tick();
        let record = TickRecord::capture(0, &sim, outcome).unwrap();
        logger.log_tick(record).await;
        assert!(!std::path::Path::new("should_not_exist.jsonl").exists());
    }

    #[tokio::test]
    async fn test_records_are_written_as_json_lines() {
        let path = temp_log_path("records");
        let logger = DebugLogger::new(true, &path).await;
        assert!(logger.is_enabled());

        let mut sim = GameSimulator::with_seed(6, 6, BotKind::Brute, 5).unwrap();
        sim.start_at(Position::new(0, 0), Position::new(3, 0)).unwrap();
        for _ in 0..3 {
            let outcome = sim.tick();
            let record = TickRecord::capture(7, &sim, outcome).unwrap();
            logger.log_tick(record).await;
        }

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let records: Vec<TickRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.game == 7 && r.direction == Direction::Right));
        assert_eq!(records[2].move_number, 3);
        assert_eq!(records[2].head, Some(Position::new(3, 0)));
        assert_eq!(records[2].food_eaten, 1);
        assert!(!records[2].game_over);
    }
}
