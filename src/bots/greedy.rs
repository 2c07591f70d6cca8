use log::debug;
use rand::rngs::StdRng;

use super::{random_safe_move, SnakeBot};
use crate::grid::BoardView;
use crate::pathfinding::PathPlanner;
use crate::types::{Direction, Position};

/// Takes the shortest path to the food. Without one, moves randomly but safely.
#[derive(Debug, Default)]
pub struct GreedyBot {
    head: Position,
}

impl GreedyBot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnakeBot for GreedyBot {
    fn name(&self) -> &'static str {
        "GreedyBot"
    }

    fn initialize(&mut self, start: Position) {
        self.head = start;
    }

    fn get_move(&mut self, view: &BoardView<'_>, rng: &mut StdRng) -> Direction {
        let planner = PathPlanner::new(view.grid);
        let dir = match view
            .food
            .and_then(|food| planner.find(self.head, food, |p| view.is_safe(p)))
        {
            Some(plan) => plan.first_move,
            None => {
                debug!("GreedyBot: no path to food from {}", self.head);
                random_safe_move(view, self.head, rng)
            }
        };

        if let Some(next) = view.step(self.head, dir) {
            self.head = next;
        }
        dir
    }
}
