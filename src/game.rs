// Snake simulation: owns the grid, the snake body and the food, and advances one tick
// at a time using the selected bot.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::VecDeque;

use crate::bots::{BotKind, SnakeBot};
use crate::config::Config;
use crate::grid::{BoardView, Grid};
use crate::types::{CellValue, Direction, Position};

/// Lifecycle of a simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// No game in progress (never started, or stopped)
    Idle,
    Running,
    /// The snake left the grid or ran into itself
    GameOver,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collision {
    Wall,
    Body,
}

/// Result of a single `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { direction: Direction, ate_food: bool },
    Collided { direction: Direction, collision: Collision },
    /// Not running; nothing happened
    Idle,
}

/// Statistics for one game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub bot: BotKind,
    pub moves: u64,
    pub food_eaten: u64,
    pub length: usize,
    pub state: GameState,
}

impl GameSummary {
    /// Average moves per food eaten; `None` before the first food
    pub fn moves_per_food(&self) -> Option<f64> {
        if self.food_eaten == 0 {
            None
        } else {
            Some(self.moves as f64 / self.food_eaten as f64)
        }
    }
}

/// Owns all mutable game state. Bots only see a `BoardView` during `tick`.
pub struct GameSimulator {
    grid: Grid,
    /// Head first, tail last
    body: VecDeque<Position>,
    food: Option<Position>,
    bot_kind: BotKind,
    bot: Box<dyn SnakeBot>,
    state: GameState,
    moves: u64,
    food_eaten: u64,
    rng: StdRng,
}

impl GameSimulator {
    /// Creates an idle simulator seeded from the operating system
    pub fn new(width: i32, height: i32, bot_kind: BotKind) -> Result<Self, String> {
        Self::with_rng(width, height, bot_kind, StdRng::from_os_rng())
    }

    /// Creates an idle simulator whose start positions, food and bot tie-breaks are reproducible
    pub fn with_seed(width: i32, height: i32, bot_kind: BotKind, seed: u64) -> Result<Self, String> {
        Self::with_rng(width, height, bot_kind, StdRng::seed_from_u64(seed))
    }

    /// Creates an idle simulator using the grid size and default bot from `config`
    pub fn from_config(config: &Config, seed: Option<u64>) -> Result<Self, String> {
        let bot_kind = config.bots.default_kind()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config.grid.width, config.grid.height, bot_kind, rng)
    }

    fn with_rng(width: i32, height: i32, bot_kind: BotKind, rng: StdRng) -> Result<Self, String> {
        let grid = Grid::new(width, height)?;
        if grid.area() < 2 {
            return Err("Grid needs room for at least the snake and one food".to_string());
        }

        Ok(GameSimulator {
            grid,
            body: VecDeque::new(),
            food: None,
            bot_kind,
            bot: bot_kind.build(),
            state: GameState::Idle,
            moves: 0,
            food_eaten: 0,
            rng,
        })
    }

    /// Starts a fresh game with the head and food at random empty cells
    pub fn start(&mut self) {
        self.grid.fill(CellValue::Empty);
        let cells: Vec<Position> = self.grid.positions().collect();
        // Grid is never empty, checked on construction
        let head = cells.choose(&mut self.rng).copied().unwrap_or_default();
        self.begin(head);
        self.place_food();
    }

    /// Starts a fresh game with the head and food at the given cells
    pub fn start_at(&mut self, head: Position, food: Position) -> Result<(), String> {
        for (what, pos) in [("head", head), ("food", food)] {
            if self.grid.is_out_of_bounds(pos) {
                return Err(format!("{} position {} is outside the grid", what, pos));
            }
        }
        if head == food {
            return Err(format!("Head and food cannot share cell {}", head));
        }

        self.grid.fill(CellValue::Empty);
        self.begin(head);
        self.grid.set(food, CellValue::Food);
        self.food = Some(food);
        Ok(())
    }

    fn begin(&mut self, head: Position) {
        self.body.clear();
        self.body.push_front(head);
        self.grid.set(head, CellValue::Snake);
        self.bot.initialize(head);

        self.food = None;
        self.moves = 0;
        self.food_eaten = 0;
        self.state = GameState::Running;
        info!("Game start: {} at {}", self.bot_kind, head);
    }

    /// Puts one food item on a uniformly random empty cell
    ///
    /// # Returns
    /// * `false` if the grid has no empty cell left; the game continues without food
    fn place_food(&mut self) -> bool {
        let empty = self.grid.positions_with(CellValue::Empty);
        match empty.choose(&mut self.rng) {
            Some(&pos) => {
                self.grid.set(pos, CellValue::Food);
                self.food = Some(pos);
                true
            }
            None => {
                warn!("No empty cell left to place food");
                self.food = None;
                false
            }
        }
    }

    /// Abandons the running game, leaving the board as it is
    pub fn stop(&mut self) {
        if self.state == GameState::Running {
            info!("Game stopped after {} moves", self.moves);
            self.state = GameState::Idle;
        }
    }

    /// Switches strategy for the next game
    ///
    /// # Returns
    /// * `Err` while a game is running
    pub fn select_bot(&mut self, bot_kind: BotKind) -> Result<(), String> {
        if self.state == GameState::Running {
            return Err(format!(
                "Cannot switch to {} while a game is running",
                bot_kind
            ));
        }
        self.bot_kind = bot_kind;
        self.bot = bot_kind.build();
        Ok(())
    }

    /// Advances the game by one move of the selected bot
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Running {
            return TickOutcome::Idle;
        }

        let head = self.head().unwrap_or_default();
        let direction = {
            let view = BoardView::new(&self.grid, self.food);
            self.bot.get_move(&view, &mut self.rng)
        };
        self.moves += 1;

        let next = match self.grid.step(head, direction) {
            Some(next) => next,
            None => return self.game_over(direction, Collision::Wall),
        };

        let ate_food = match self.grid.get(next) {
            CellValue::Snake => return self.game_over(direction, Collision::Body),
            CellValue::Food => true,
            CellValue::Empty => false,
        };

        self.body.push_front(next);
        self.grid.set(next, CellValue::Snake);
        if ate_food {
            self.food_eaten += 1;
            self.place_food();
        } else if let Some(tail) = self.body.pop_back() {
            self.grid.set(tail, CellValue::Empty);
        }

        debug!(
            "Move {}: {} -> {}{}",
            self.moves,
            direction,
            next,
            if ate_food { " (ate food)" } else { "" }
        );
        TickOutcome::Moved { direction, ate_food }
    }

    fn game_over(&mut self, direction: Direction, collision: Collision) -> TickOutcome {
        self.state = GameState::GameOver;
        info!(
            "Game over: {} hit {:?} after {} moves, score {}",
            self.bot_kind, collision, self.moves, self.food_eaten
        );
        TickOutcome::Collided {
            direction,
            collision,
        }
    }

    /// Ticks until the game ends or `max_moves` moves have been made
    pub fn run_to_completion(&mut self, max_moves: u64) -> GameSummary {
        while self.state == GameState::Running && self.moves < max_moves {
            self.tick();
        }
        self.summary()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            bot: self.bot_kind,
            moves: self.moves,
            food_eaten: self.food_eaten,
            length: self.body.len(),
            state: self.state,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn bot_kind(&self) -> BotKind {
        self.bot_kind
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_out_of_bounds(&self, pos: Position) -> bool {
        self.grid.is_out_of_bounds(pos)
    }

    /// Cell contents, or `None` off the grid
    pub fn cell_value(&self, pos: Position) -> Option<CellValue> {
        if self.grid.is_out_of_bounds(pos) {
            None
        } else {
            Some(self.grid.get(pos))
        }
    }

    pub fn head(&self) -> Option<Position> {
        self.body.front().copied()
    }

    /// Snake body, head first
    pub fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn food_eaten(&self) -> u64 {
        self.food_eaten
    }
}
