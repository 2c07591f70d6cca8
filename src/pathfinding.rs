// Grid searches used by the bots
//
// - `PathPlanner`: A* from a source cell to a target cell, returning the first move
// - `farthest_reachable`: BFS flood fill returning the cell that takes the most moves to reach
//
// Search state lives only for the duration of one call.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::grid::Grid;
use crate::types::{Direction, Position};

/// Multiplier applied to the Manhattan heuristic.
///
/// Slightly above 1 so that among equal-length paths the one heading more
/// directly at the target is expanded first. Edge costs are 1, so any longer
/// path costs at least one more and is never preferred on practical grid sizes.
pub const HEURISTIC_TIEBREAK_WEIGHT: f64 = 1.001;

/// Result of a successful path search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPlan {
    /// Direction from the source to the second cell of the path
    pub first_move: Direction,
    /// Number of moves from source to target
    pub length: usize,
}

/// Cell found by `farthest_reachable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarthestCell {
    pub position: Position,
    pub distance: usize,
}

fn heuristic(from: Position, to: Position) -> f64 {
    HEURISTIC_TIEBREAK_WEIGHT * f64::from(from.manhattan_distance(to))
}

/// Per-cell search bookkeeping
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    g_score: f64,
    f_score: f64,
    direction_to_parent: Option<Direction>,
}

impl SearchNode {
    fn undiscovered() -> Self {
        SearchNode {
            g_score: f64::INFINITY,
            f_score: f64::INFINITY,
            direction_to_parent: None,
        }
    }
}

/// Open-set entry. Lowest f-score pops first; equal scores pop in insertion order.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_score: f64,
    sequence: u64,
    position: Position,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* shortest-path search over a grid with a caller supplied traversability test
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner<'a> {
    grid: &'a Grid,
    exempt_target: bool,
}

impl<'a> PathPlanner<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        PathPlanner {
            grid,
            exempt_target: false,
        }
    }

    /// When set, the target cell is always enterable even if the predicate rejects it
    pub fn exempt_target(mut self, exempt: bool) -> Self {
        self.exempt_target = exempt;
        self
    }

    /// Finds the first move of a shortest path from `source` to `target`
    ///
    /// # Returns
    /// * `None` if the target cannot be reached or equals the source
    pub fn find<S>(&self, source: Position, target: Position, is_safe: S) -> Option<PathPlan>
    where
        S: Fn(Position) -> bool,
    {
        self.find_observed(source, target, is_safe, |_| {})
    }

    /// Same as `find`, but reports every in-bounds neighbour the search refused to
    /// enter (unsafe or already closed) to `on_blocked`
    pub fn find_observed<S, B>(
        &self,
        source: Position,
        target: Position,
        is_safe: S,
        mut on_blocked: B,
    ) -> Option<PathPlan>
    where
        S: Fn(Position) -> bool,
        B: FnMut(Position),
    {
        let mut nodes: HashMap<Position, SearchNode> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut sequence: u64 = 0;

        let start_f = heuristic(source, target);
        nodes.insert(
            source,
            SearchNode {
                g_score: 0.0,
                f_score: start_f,
                direction_to_parent: None,
            },
        );
        open.push(OpenEntry {
            f_score: start_f,
            sequence,
            position: source,
        });

        while let Some(entry) = open.pop() {
            let current = entry.position;
            if closed.contains(&current) {
                continue;
            }
            let current_node = nodes[&current];
            // Superseded by a later push with a better score
            if entry.f_score != current_node.f_score {
                continue;
            }

            if current == target {
                return self.reconstruct(&nodes, source, target);
            }

            closed.insert(current);

            for dir in Direction::ALL {
                let neighbor = match self.grid.step(current, dir) {
                    Some(p) => p,
                    None => continue,
                };

                let enterable = (self.exempt_target && neighbor == target)
                    || (is_safe(neighbor) && !closed.contains(&neighbor));
                if !enterable {
                    on_blocked(neighbor);
                    continue;
                }

                let tentative_g = current_node.g_score + 1.0;
                let node = nodes
                    .entry(neighbor)
                    .or_insert_with(SearchNode::undiscovered);
                if tentative_g < node.g_score {
                    node.direction_to_parent = Some(dir.opposite());
                    node.g_score = tentative_g;
                    node.f_score = tentative_g + heuristic(neighbor, target);

                    sequence += 1;
                    open.push(OpenEntry {
                        f_score: node.f_score,
                        sequence,
                        position: neighbor,
                    });
                }
            }
        }

        None
    }

    /// Walks parent pointers back from the target, remembering the last step taken
    fn reconstruct(
        &self,
        nodes: &HashMap<Position, SearchNode>,
        source: Position,
        target: Position,
    ) -> Option<PathPlan> {
        let mut current = target;
        let mut first_move = None;
        let mut length = 0;

        while current != source {
            let to_parent = nodes.get(&current)?.direction_to_parent?;
            first_move = Some(to_parent.opposite());
            current = self.grid.step(current, to_parent)?;
            length += 1;
        }

        first_move.map(|first_move| PathPlan { first_move, length })
    }
}

/// Breadth-first flood fill from `source`, returning the last cell discovered at the
/// greatest depth.
///
/// # Returns
/// * `None` if no cell other than the source is reachable
pub fn farthest_reachable<S>(grid: &Grid, source: Position, is_safe: S) -> Option<FarthestCell>
where
    S: Fn(Position) -> bool,
{
    let mut visited: HashSet<Position> = HashSet::with_capacity(grid.area());
    let mut frontier: VecDeque<(Position, usize)> = VecDeque::new();
    let mut farthest = None;

    visited.insert(source);
    frontier.push_back((source, 0));

    while let Some((current, distance)) = frontier.pop_front() {
        for dir in Direction::ALL {
            let neighbor = match grid.step(current, dir) {
                Some(p) => p,
                None => continue,
            };
            if !is_safe(neighbor) || !visited.insert(neighbor) {
                continue;
            }
            frontier.push_back((neighbor, distance + 1));
            farthest = Some(FarthestCell {
                position: neighbor,
                distance: distance + 1,
            });
        }
    }

    farthest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn open_grid(width: i32, height: i32) -> Grid {
        Grid::new(width, height).unwrap()
    }

    #[test]
    fn test_first_move_points_at_target() {
        let grid = open_grid(10, 10);
        let planner = PathPlanner::new(&grid);
        let plan = planner
            .find(Position::new(2, 2), Position::new(2, 6), |p| grid.is_safe(p))
            .unwrap();
        assert_eq!(plan.first_move, Direction::Down);
        assert_eq!(plan.length, 4);
    }

    #[test]
    fn test_same_source_and_target_has_no_move() {
        let grid = open_grid(5, 5);
        let pos = Position::new(1, 1);
        assert_eq!(PathPlanner::new(&grid).find(pos, pos, |p| grid.is_safe(p)), None);
    }

    #[test]
    fn test_walled_off_target_is_unreachable() {
        let mut grid = open_grid(5, 5);
        for y in 0..5 {
            grid.set(Position::new(2, y), CellValue::Snake);
        }
        let plan = PathPlanner::new(&grid).find(
            Position::new(0, 0),
            Position::new(4, 4),
            |p| grid.is_safe(p),
        );
        assert_eq!(plan, None);
    }

    #[test]
    fn test_detours_around_obstacle() {
        // Wall between source and target, open at the bottom
        let mut grid = open_grid(5, 5);
        for y in 0..4 {
            grid.set(Position::new(2, y), CellValue::Snake);
        }
        let plan = PathPlanner::new(&grid)
            .find(Position::new(0, 0), Position::new(4, 0), |p| grid.is_safe(p))
            .unwrap();
        assert_eq!(plan.length, 12);
        assert_eq!(plan.first_move, Direction::Right);
    }

    #[test]
    fn test_exempt_target_allows_unsafe_target() {
        let mut grid = open_grid(5, 5);
        let target = Position::new(3, 0);
        grid.set(target, CellValue::Snake);

        let strict = PathPlanner::new(&grid).find(Position::new(0, 0), target, |p| grid.is_safe(p));
        assert_eq!(strict, None);

        let exempt = PathPlanner::new(&grid)
            .exempt_target(true)
            .find(Position::new(0, 0), target, |p| grid.is_safe(p))
            .unwrap();
        assert_eq!(exempt.first_move, Direction::Right);
        assert_eq!(exempt.length, 3);
    }

    #[test]
    fn test_observer_sees_blocked_neighbours() {
        let mut grid = open_grid(3, 3);
        let blocker = Position::new(1, 0);
        grid.set(blocker, CellValue::Snake);
        let mut blocked = Vec::new();

        PathPlanner::new(&grid).find_observed(
            Position::new(0, 0),
            Position::new(0, 2),
            |p| grid.is_safe(p),
            |p| blocked.push(p),
        );
        assert!(blocked.contains(&blocker));
    }

    #[test]
    fn test_farthest_from_corner_is_opposite_corner() {
        let grid = open_grid(7, 4);
        let found = farthest_reachable(&grid, Position::new(0, 0), |p| grid.is_safe(p)).unwrap();
        assert_eq!(found.position, Position::new(6, 3));
        assert_eq!(found.distance, 7 + 4 - 2);
    }

    #[test]
    fn test_farthest_with_no_room_is_none() {
        let mut grid = open_grid(3, 1);
        grid.set(Position::new(1, 0), CellValue::Snake);
        assert_eq!(
            farthest_reachable(&grid, Position::new(0, 0), |p| grid.is_safe(p)),
            None
        );
    }

    #[test]
    fn test_farthest_follows_corridor() {
        // Snake-shaped corridor: distance counts moves, not straight-line distance
        let mut grid = open_grid(3, 3);
        grid.set(Position::new(1, 0), CellValue::Snake);
        grid.set(Position::new(1, 1), CellValue::Snake);
        let found = farthest_reachable(&grid, Position::new(0, 0), |p| grid.is_safe(p)).unwrap();
        assert_eq!(found.position, Position::new(2, 0));
        assert_eq!(found.distance, 6);
    }
}
