//! Game board representation and collision detection

use crate::piece::Piece;
use ratatui::style::Color;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a piece fits: every block inside the board and on an empty cell
    pub fn fits(&self, piece: &Piece) -> bool {
        piece
            .block_positions()
            .all(|(row, col)| self.get(row, col).is_some_and(|cell| cell.is_empty()))
    }

    /// Write a piece's color into every cell it occupies
    pub fn lock_piece(&mut self, piece: &Piece) {
        let color = piece.color();
        for (row, col) in piece.block_positions() {
            self.set(row, col, Cell::Filled(color));
        }
    }

    /// Clear completed lines and return the number cleared
    pub fn clear_lines(&mut self) -> usize {
        let mut lines_cleared = 0;
        let mut row = self.cells.len();

        while row > 0 {
            if self.is_line_full(row - 1) {
                self.cells.remove(row - 1);
                self.cells.insert(0, vec![Cell::Empty; self.width]);
                lines_cleared += 1;
                // The row above has shifted into this index, look at it again
            } else {
                row -= 1;
            }
        }

        lines_cleared
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
