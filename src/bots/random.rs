use rand::rngs::StdRng;

use super::{random_safe_move, SnakeBot};
use crate::grid::BoardView;
use crate::types::{Direction, Position};

/// Moves in a random direction that stays on the grid and off the snake
#[derive(Debug, Default)]
pub struct RandomBot {
    head: Position,
}

impl RandomBot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnakeBot for RandomBot {
    fn name(&self) -> &'static str {
        "RandomBot"
    }

    fn initialize(&mut self, start: Position) {
        self.head = start;
    }

    fn get_move(&mut self, view: &BoardView<'_>, rng: &mut StdRng) -> Direction {
        let dir = random_safe_move(view, self.head, rng);
        if let Some(next) = view.step(self.head, dir) {
            self.head = next;
        }
        dir
    }
}
