use log::debug;
use rand::rngs::StdRng;
use std::collections::{HashMap, VecDeque};

use super::{random_safe_move, SnakeBot};
use crate::grid::BoardView;
use crate::pathfinding::{farthest_reachable, PathPlanner};
use crate::types::{Direction, Position};

/// Why `GreedyTailBot` picked its move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailDecision {
    /// Shortest path to the food
    Food(Direction),
    /// Toward the oldest body part reachable from the head
    ChaseTail(Direction),
    /// Toward the farthest reachable cell, waiting for the body part to clear
    Stall(Direction),
    /// Nothing could be planned; random safe move
    Fallback(Direction),
}

impl TailDecision {
    pub fn direction(&self) -> Direction {
        match *self {
            TailDecision::Food(d)
            | TailDecision::ChaseTail(d)
            | TailDecision::Stall(d)
            | TailDecision::Fallback(d) => d,
        }
    }
}

/// Takes the shortest path to the food. If there is none, heads for the oldest body
/// part it can reach; if it would get there before that part clears, it stalls by
/// heading for the farthest reachable cell instead.
#[derive(Debug, Default)]
pub struct GreedyTailBot {
    head: Position,
    /// Body parts, tail first
    body: VecDeque<Position>,
    /// Moves left until each body part clears; the tail is at 0
    ages: HashMap<Position, usize>,
}

impl GreedyTailBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds bookkeeping for an existing body, given tail first
    pub fn with_body<I>(body: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut bot = Self::new();
        for part in body {
            bot.body.push_back(part);
            bot.ages.insert(part, bot.body.len() - 1);
            bot.head = part;
        }
        bot
    }

    /// Moves left until the body part at `pos` clears, if it is part of the body
    pub fn age_of(&self, pos: Position) -> Option<usize> {
        self.ages.get(&pos).copied()
    }

    /// Computes the next move without updating any bookkeeping
    pub fn decide(&self, view: &BoardView<'_>, rng: &mut StdRng) -> TailDecision {
        let planner = PathPlanner::new(view.grid).exempt_target(true);
        let is_safe = |p: Position| view.is_safe(p);

        let mut oldest = (self.head, self.age_of(self.head).unwrap_or(0));
        if let Some(food) = view.food {
            let food_plan = planner.find_observed(self.head, food, is_safe, |blocked| {
                if let Some(&age) = self.ages.get(&blocked) {
                    if age < oldest.1 {
                        oldest = (blocked, age);
                    }
                }
            });
            if let Some(plan) = food_plan {
                return TailDecision::Food(plan.first_move);
            }
        }

        let (part, age) = oldest;
        let to_part = planner.find(self.head, part, is_safe);
        let arrives_early = match to_part {
            Some(plan) => plan.length != 1 && plan.length < age,
            None => true,
        };
        debug!(
            "GreedyTailBot: no path to food, oldest reachable part {} (age {}), plan {:?}",
            part, age, to_part
        );

        if arrives_early {
            let stall = farthest_reachable(view.grid, self.head, is_safe)
                .and_then(|cell| planner.find(self.head, cell.position, is_safe));
            if let Some(plan) = stall {
                return TailDecision::Stall(plan.first_move);
            }
        }

        match to_part {
            Some(plan) => TailDecision::ChaseTail(plan.first_move),
            None => TailDecision::Fallback(random_safe_move(view, self.head, rng)),
        }
    }

    /// Applies a confirmed move to the body and age bookkeeping
    fn advance(&mut self, next: Position, food: Option<Position>) {
        self.head = next;

        if food != Some(next) {
            if let Some(tail) = self.body.pop_front() {
                self.ages.remove(&tail);
            }
            for age in self.ages.values_mut() {
                *age = age.saturating_sub(1);
            }
        }

        self.body.push_back(next);
        self.ages.insert(next, self.body.len() - 1);
    }
}

impl SnakeBot for GreedyTailBot {
    fn name(&self) -> &'static str {
        "GreedyTailBot"
    }

    fn initialize(&mut self, start: Position) {
        *self = Self::with_body([start]);
    }

    fn get_move(&mut self, view: &BoardView<'_>, rng: &mut StdRng) -> Direction {
        let decision = self.decide(view, rng);
        debug!("GreedyTailBot: {:?}", decision);

        let dir = decision.direction();
        // Leaving the grid ends the game, so there is nothing left to track
        if let Some(next) = view.step(self.head, dir) {
            self.advance(next, view.food);
        }
        dir
    }
}
