// Snake-controlling strategies
//
// Every bot keeps its own copy of whatever it needs (head position, body, ages) and
// updates it from the moves it returns. The simulator only ever hands out a
// read-only `BoardView`.

mod brute;
mod greedy;
mod greedy_tail;
mod random;
mod spacer;

pub use brute::BruteBot;
pub use greedy::GreedyBot;
pub use greedy_tail::{GreedyTailBot, TailDecision};
pub use random::RandomBot;
pub use spacer::SpacerBot;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grid::BoardView;
use crate::types::{Direction, Position};

/// Common capability of all strategies
pub trait SnakeBot: Send {
    /// Display name of the strategy
    fn name(&self) -> &'static str;

    /// Resets internal bookkeeping for a fresh game starting at `start`
    fn initialize(&mut self, start: Position);

    /// Chooses the next move. Called exactly once per tick.
    fn get_move(&mut self, view: &BoardView<'_>, rng: &mut StdRng) -> Direction;
}

/// The fixed set of available strategies
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BotKind {
    Spacer,
    GreedyTail,
    Greedy,
    Brute,
    Random,
}

impl BotKind {
    /// Selection order; the first entry is the default
    pub const ALL: [BotKind; 5] = [
        BotKind::Spacer,
        BotKind::GreedyTail,
        BotKind::Greedy,
        BotKind::Brute,
        BotKind::Random,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BotKind::Spacer => "SpacerBot",
            BotKind::GreedyTail => "GreedyTailBot",
            BotKind::Greedy => "GreedyBot",
            BotKind::Brute => "BruteBot",
            BotKind::Random => "RandomBot",
        }
    }

    /// Creates a fresh, uninitialised bot of this kind
    pub fn build(&self) -> Box<dyn SnakeBot> {
        match self {
            BotKind::Spacer => Box::new(SpacerBot::new()),
            BotKind::GreedyTail => Box::new(GreedyTailBot::new()),
            BotKind::Greedy => Box::new(GreedyBot::new()),
            BotKind::Brute => Box::new(BruteBot::new()),
            BotKind::Random => Box::new(RandomBot::new()),
        }
    }
}

impl Default for BotKind {
    fn default() -> Self {
        BotKind::ALL[0]
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BotKind {
    type Err = String;

    /// Accepts display names and short forms, ignoring case, `-` and `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let normalized = normalized.strip_suffix("bot").unwrap_or(&normalized);

        match normalized {
            "spacer" => Ok(BotKind::Spacer),
            "greedytail" => Ok(BotKind::GreedyTail),
            "greedy" => Ok(BotKind::Greedy),
            "brute" => Ok(BotKind::Brute),
            "random" => Ok(BotKind::Random),
            _ => Err(format!(
                "Unknown bot '{}'. Expected one of: {}",
                s,
                BotKind::ALL
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Shared fallback: a random direction leading to a safe cell, or `Up` when none exists.
///
/// `Up` in the no-safe-move case is not itself safe; the snake is trapped either way.
pub fn random_safe_move(view: &BoardView<'_>, head: Position, rng: &mut StdRng) -> Direction {
    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    directions
        .into_iter()
        .find(|&dir| view.step(head, dir).is_some_and(|next| view.is_safe(next)))
        .unwrap_or_else(|| {
            debug!("No safe move from {}, defaulting to up", head);
            Direction::Up
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::types::CellValue;
    use rand::SeedableRng;

    #[test]
    fn test_parse_bot_names() {
        assert_eq!("spacer".parse::<BotKind>().unwrap(), BotKind::Spacer);
        assert_eq!("SpacerBot".parse::<BotKind>().unwrap(), BotKind::Spacer);
        assert_eq!("greedy-tail".parse::<BotKind>().unwrap(), BotKind::GreedyTail);
        assert_eq!("GREEDY_TAIL".parse::<BotKind>().unwrap(), BotKind::GreedyTail);
        assert_eq!("GreedyBot".parse::<BotKind>().unwrap(), BotKind::Greedy);
        assert_eq!("brute".parse::<BotKind>().unwrap(), BotKind::Brute);
        assert_eq!("Random".parse::<BotKind>().unwrap(), BotKind::Random);
        assert!("astar".parse::<BotKind>().is_err());
    }

    #[test]
    fn test_names_round_trip_through_parse() {
        for kind in BotKind::ALL {
            assert_eq!(kind.name().parse::<BotKind>().unwrap(), kind);
            assert_eq!(kind.build().name(), kind.name());
        }
    }

    #[test]
    fn test_default_is_spacer() {
        assert_eq!(BotKind::default(), BotKind::Spacer);
    }

    #[test]
    fn test_random_safe_move_picks_only_open_cell() {
        let mut grid = Grid::new(3, 3).unwrap();
        let head = Position::new(1, 1);
        grid.set(head, CellValue::Snake);
        grid.set(Position::new(1, 0), CellValue::Snake);
        grid.set(Position::new(0, 1), CellValue::Snake);
        grid.set(Position::new(2, 1), CellValue::Snake);
        let view = BoardView::new(&grid, None);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(random_safe_move(&view, head, &mut rng), Direction::Down);
        }
    }

    #[test]
    fn test_random_safe_move_defaults_to_up_when_trapped() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(Position::new(0, 0), CellValue::Snake);
        let view = BoardView::new(&grid, None);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            random_safe_move(&view, Position::new(0, 0), &mut rng),
            Direction::Up
        );
    }
}
