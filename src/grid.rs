// Fixed-size cell store for the play area, plus the read-only view handed to bots

use crate::types::{CellValue, Direction, Position};

/// Rectangular grid of cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Creates an empty grid
    ///
    /// # Returns
    /// * `Err` if either dimension is not positive
    pub fn new(width: i32, height: i32) -> Result<Self, String> {
        if width <= 0 || height <= 0 {
            return Err(format!(
                "Grid dimensions must be positive, got {}x{}",
                width, height
            ));
        }

        Ok(Grid {
            width,
            height,
            cells: vec![CellValue::Empty; (width as usize) * (height as usize)],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn is_out_of_bounds(&self, pos: Position) -> bool {
        pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    /// Returns the value stored at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds; callers check bounds first.
    pub fn get(&self, pos: Position) -> CellValue {
        assert!(!self.is_out_of_bounds(pos), "{} is outside the grid", pos);
        self.cells[self.index(pos)]
    }

    /// Stores `value` at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds; callers check bounds first.
    pub fn set(&mut self, pos: Position, value: CellValue) {
        assert!(!self.is_out_of_bounds(pos), "{} is outside the grid", pos);
        let idx = self.index(pos);
        self.cells[idx] = value;
    }

    /// Resets every cell to `value`
    pub fn fill(&mut self, value: CellValue) {
        self.cells.iter_mut().for_each(|cell| *cell = value);
    }

    /// Neighbour of `pos` in `dir`, or `None` when that neighbour is off the grid
    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let next = dir.apply(pos);
        if self.is_out_of_bounds(next) {
            None
        } else {
            Some(next)
        }
    }

    /// A cell is safe to move into when it is on the grid and not part of the snake
    pub fn is_safe(&self, pos: Position) -> bool {
        !self.is_out_of_bounds(pos) && self.get(pos) != CellValue::Snake
    }

    /// All positions, column by column
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Position::new(x, y)))
    }

    /// Positions currently holding `value`
    pub fn positions_with(&self, value: CellValue) -> Vec<Position> {
        self.positions().filter(|&p| self.get(p) == value).collect()
    }
}

/// What a bot may see during one tick: the grid and the food location.
///
/// Bots never get mutable access to simulator state.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub grid: &'a Grid,
    pub food: Option<Position>,
}

impl<'a> BoardView<'a> {
    pub fn new(grid: &'a Grid, food: Option<Position>) -> Self {
        BoardView { grid, food }
    }

    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        self.grid.step(pos, dir)
    }

    pub fn is_safe(&self, pos: Position) -> bool {
        self.grid.is_safe(pos)
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }
}
