use rand::rngs::StdRng;

use super::SnakeBot;
use crate::grid::BoardView;
use crate::types::{Direction, Position};

/// Follows the same space-filling cycle forever.
///
/// Row 0 runs right, odd rows run left down to column 1, even rows run right, and
/// column 0 is the return lane back up to the origin. The cycle closes only when the
/// grid height is even; on odd heights the snake eventually leaves the grid.
#[derive(Debug, Default)]
pub struct BruteBot {
    head: Position,
}

impl BruteBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next move of the cycle for a head at `head` on a `width` x `height` grid
    pub fn cycle_move(head: Position, width: i32, height: i32) -> Direction {
        if head.x == 0 {
            return if head.y == 0 {
                Direction::Right
            } else {
                Direction::Up
            };
        }

        if head.y % 2 == 0 {
            if head.x == width - 1 {
                Direction::Down
            } else {
                Direction::Right
            }
        } else if head.x == 1 {
            if head.y == height - 1 {
                Direction::Left
            } else {
                Direction::Down
            }
        } else {
            Direction::Left
        }
    }
}

impl SnakeBot for BruteBot {
    fn name(&self) -> &'static str {
        "BruteBot"
    }

    fn initialize(&mut self, start: Position) {
        self.head = start;
    }

    fn get_move(&mut self, view: &BoardView<'_>, _rng: &mut StdRng) -> Direction {
        let dir = Self::cycle_move(self.head, view.width(), view.height());
        if let Some(next) = view.step(self.head, dir) {
            self.head = next;
        }
        dir
    }
}
