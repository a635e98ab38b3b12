//! Tetromino catalog and shape matrices
//!
//! Each of the 7 kinds owns its spawn shape and color. Shapes are plain
//! boolean matrices; rotating one builds a new matrix.

use ratatui::style::Color;

// I    ####
//
// J    #..    L    ..#    O    ##
//      ###         ###         ##
//
// S    .##    T    .#.    Z    ##.
//      ##.         ###         .##
const I_SHAPE: &[&[u8]] = &[&[1, 1, 1, 1]];
const J_SHAPE: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1]];
const L_SHAPE: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1]];
const O_SHAPE: &[&[u8]] = &[&[1, 1], &[1, 1]];
const S_SHAPE: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];
const T_SHAPE: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1]];
const Z_SHAPE: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];

/// The 7 tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

impl PieceKind {
    /// Every kind, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Get the color for this kind
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Rgb(0, 255, 255),
            PieceKind::J => Color::Rgb(0, 0, 255),
            PieceKind::L => Color::Rgb(255, 165, 0),
            PieceKind::O => Color::Rgb(255, 255, 0),
            PieceKind::S => Color::Rgb(0, 128, 0),
            PieceKind::T => Color::Rgb(128, 0, 128),
            PieceKind::Z => Color::Rgb(255, 0, 0),
        }
    }

    /// Get the spawn shape for this kind
    pub fn shape(&self) -> Shape {
        let rows = match self {
            PieceKind::I => I_SHAPE,
            PieceKind::J => J_SHAPE,
            PieceKind::L => L_SHAPE,
            PieceKind::O => O_SHAPE,
            PieceKind::S => S_SHAPE,
            PieceKind::T => T_SHAPE,
            PieceKind::Z => Z_SHAPE,
        };
        Shape::new(
            rows.iter()
                .map(|row| row.iter().map(|&cell| cell != 0).collect())
                .collect(),
        )
    }

    /// Single-letter name, as used in logs
    pub fn name(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }
}

/// Occupancy matrix of a piece, `rows[row][col]`, row 0 on top.
///
/// Rows may have different lengths; a missing cell counts as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn new(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row, used to center the piece on spawn
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn is_filled(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Offsets (row, col) of all occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(col, _)| (row as i32, col as i32))
        })
    }

    /// Rotate 90° clockwise: `rotated[i][j] = self[R-1-j][i]`
    pub fn rotated(&self) -> Shape {
        let rows = self.height();
        let cols = self.width();
        Shape::new(
            (0..cols)
                .map(|i| (0..rows).map(|j| self.is_filled(rows - 1 - j, i)).collect())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: &[&[u8]]) -> Shape {
        Shape::new(
            rows.iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
        )
    }

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().cells().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_colors_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.color(), b.color(), "{:?} and {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_rotate_t() {
        let rotated = PieceKind::T.shape().rotated();
        assert_eq!(rotated, shape(&[&[1, 0], &[1, 1], &[1, 0]]));
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let i = PieceKind::I.shape();
        let rotated = i.rotated();
        assert_eq!((i.height(), i.width()), (1, 4));
        assert_eq!((rotated.height(), rotated.width()), (4, 1));
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let original = kind.shape();
            let back = original.rotated().rotated().rotated().rotated();
            assert_eq!(back, original, "{:?}", kind);
        }
    }

    #[test]
    fn test_jagged_rows_read_as_empty() {
        let jagged = shape(&[&[1, 1, 1], &[1]]);
        let rotated = jagged.rotated();
        assert_eq!(rotated, shape(&[&[1, 1], &[0, 1], &[0, 1]]));
    }

    #[test]
    fn test_cells_offsets() {
        let cells: Vec<_> = PieceKind::S.shape().cells().collect();
        assert_eq!(cells, vec![(0, 1), (0, 2), (1, 0), (1, 1)]);
    }
}
