use log::debug;
use rand::rngs::StdRng;
use std::collections::VecDeque;

use super::{random_safe_move, SnakeBot};
use crate::grid::BoardView;
use crate::pathfinding::PathPlanner;
use crate::types::{Direction, Position};

/// Prefers a path to the food that keeps one free cell between the route and any wall
/// or body part. Falls back to the plain shortest path, then to a random safe move.
#[derive(Debug, Default)]
pub struct SpacerBot {
    head: Position,
    /// Body parts, tail first
    body: VecDeque<Position>,
}

impl SpacerBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds bookkeeping for an existing body, given tail first
    pub fn with_body<I>(body: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let body: VecDeque<Position> = body.into_iter().collect();
        let head = body.back().copied().unwrap_or_default();
        SpacerBot { head, body }
    }

    /// The two most recent body positions. The snake is leaving them, so they do not
    /// count against clearance.
    fn recent_heads(&self) -> (Position, Position) {
        let latest = self.body.back().copied().unwrap_or(self.head);
        let previous = if self.body.len() >= 2 {
            self.body[self.body.len() - 2]
        } else {
            latest
        };
        (latest, previous)
    }

    /// Whether `pos` is safe and all eight surrounding cells are on the grid and free
    pub fn has_clearance(&self, view: &BoardView<'_>, pos: Position) -> bool {
        if !view.is_safe(pos) {
            return false;
        }

        let (latest, previous) = self.recent_heads();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let around = Position::new(pos.x + dx, pos.y + dy);
                if (dx == 0 && dy == 0) || around == latest || around == previous {
                    continue;
                }
                if !view.is_safe(around) {
                    return false;
                }
            }
        }
        true
    }

    fn choose(&self, view: &BoardView<'_>, rng: &mut StdRng) -> Direction {
        let planner = PathPlanner::new(view.grid);

        if let Some(food) = view.food {
            if let Some(plan) = planner.find(self.head, food, |p| self.has_clearance(view, p)) {
                return plan.first_move;
            }
            debug!("SpacerBot: no spaced path to food, trying unrestricted path");

            if let Some(plan) = planner.find(self.head, food, |p| view.is_safe(p)) {
                return plan.first_move;
            }
        }

        debug!("SpacerBot: no path to food from {}", self.head);
        random_safe_move(view, self.head, rng)
    }
}

impl SnakeBot for SpacerBot {
    fn name(&self) -> &'static str {
        "SpacerBot"
    }

    fn initialize(&mut self, start: Position) {
        *self = Self::with_body([start]);
    }

    fn get_move(&mut self, view: &BoardView<'_>, rng: &mut StdRng) -> Direction {
        let dir = self.choose(view, rng);

        if let Some(next) = view.step(self.head, dir) {
            self.head = next;
            if view.food != Some(next) {
                self.body.pop_front();
            }
            self.body.push_back(next);
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::types::CellValue;

    #[test]
    fn test_clearance_near_wall() {
        let grid = Grid::new(10, 10).unwrap();
        let view = BoardView::new(&grid, None);
        let bot = SpacerBot::with_body([Position::new(5, 5)]);

        assert!(bot.has_clearance(&view, Position::new(1, 1)));
        assert!(!bot.has_clearance(&view, Position::new(0, 4)));
        assert!(!bot.has_clearance(&view, Position::new(9, 9)));
    }

    #[test]
    fn test_clearance_ignores_two_latest_body_parts() {
        let mut grid = Grid::new(10, 10).unwrap();
        let body = [Position::new(3, 5), Position::new(4, 5), Position::new(5, 5)];
        for part in body {
            grid.set(part, CellValue::Snake);
        }
        let view = BoardView::new(&grid, None);
        let bot = SpacerBot::with_body(body);

        // Next to the head and neck only
        assert!(bot.has_clearance(&view, Position::new(5, 4)));
        // Diagonal to the tail, which still counts
        assert!(!bot.has_clearance(&view, Position::new(4, 6)));
    }
}
