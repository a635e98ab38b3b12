//! Active falling piece
//!
//! A `Piece` is a plain value. Moving or rotating builds a candidate piece;
//! the game validates it against the board and either commits or drops it.

use crate::tetromino::{PieceKind, Shape};
use ratatui::style::Color;

/// The currently falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The kind of tetromino
    pub kind: PieceKind,
    /// Current shape (replaced on rotation)
    pub shape: Shape,
    /// Column of the shape's top-left corner
    pub x: i32,
    /// Row of the shape's top-left corner, row 0 is the top of the board
    pub y: i32,
}

impl Piece {
    /// Create a piece centered horizontally at the top of a board `board_width` wide
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let shape = kind.shape();
        let x = (board_width / 2) as i32 - (shape.width() / 2) as i32;
        Self { kind, shape, x, y: 0 }
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Absolute (row, col) positions of all occupied cells
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(|(dr, dc)| (self.y + dr, self.x + dc))
    }

    /// Candidate piece offset by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Piece {
        Piece {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Candidate piece rotated clockwise around the same origin
    pub fn rotated(&self) -> Piece {
        Piece {
            shape: self.shape.rotated(),
            ..self.clone()
        }
    }
}
