//! Core game state and logic
//!
//! `Game` is a synchronous state machine. The caller feeds it actions and
//! elapsed time, then reads its fields back to render. It never looks at a
//! clock itself.

use crate::board::Board;
use crate::piece::Piece;
use crate::randomizer::PieceSource;
use crate::score::Score;
use std::time::Duration;
use tracing::{debug, info};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for the first key press
    NotStarted,
    Running,
    Paused,
    /// A new piece could not be placed
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Any key that is not bound to something else
    Start,
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Pause,
    Restart,
    Quit,
}

/// The main game struct
pub struct Game {
    board: Board,
    piece: Piece,
    score: Score,
    state: GameState,
    source: Box<dyn PieceSource>,
    /// Time accumulated since the last automatic drop
    since_fall: Duration,
}

impl Game {
    /// Create a new game on a `width` x `height` board
    pub fn new(width: usize, height: usize, mut source: Box<dyn PieceSource>) -> Self {
        let board = Board::new(width, height);
        let piece = Piece::spawn(source.next_kind(), width);
        let mut game = Self {
            board,
            piece,
            score: Score::new(),
            state: GameState::NotStarted,
            source,
            since_fall: Duration::ZERO,
        };
        if !game.is_valid_position() {
            game.state = GameState::GameOver;
        }
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Time between automatic drops at the current level
    pub fn fall_interval(&self) -> Duration {
        self.score.fall_interval()
    }

    /// Start over: empty board, fresh piece, zero score, waiting to start
    pub fn reset(&mut self) {
        info!(points = self.score.points, "resetting game");
        self.board = Board::new(self.board.width(), self.board.height());
        self.score = Score::new();
        self.state = GameState::NotStarted;
        self.since_fall = Duration::ZERO;
        self.new_piece();
    }

    /// Spawn the next piece at the top center; tops out if it does not fit
    pub fn new_piece(&mut self) {
        let kind = self.source.next_kind();
        self.piece = Piece::spawn(kind, self.board.width());
        debug!(kind = %kind.name(), x = self.piece.x, "spawned piece");

        if !self.is_valid_position() {
            info!(points = self.score.points, level = self.score.level, "game over");
            self.state = GameState::GameOver;
        }
    }

    /// Whether the current piece sits inside the board on empty cells
    pub fn is_valid_position(&self) -> bool {
        self.board.fits(&self.piece)
    }

    /// Where the current piece would land if dropped straight down
    pub fn ghost(&self) -> Piece {
        let mut ghost = self.piece.clone();
        loop {
            let below = ghost.shifted(0, 1);
            if !self.board.fits(&below) {
                return ghost;
            }
            ghost = below;
        }
    }

    /// Commit `candidate` as the current piece if it fits
    fn try_replace(&mut self, candidate: Piece) -> bool {
        if self.state == GameState::GameOver || !self.board.fits(&candidate) {
            return false;
        }
        self.piece = candidate;
        true
    }

    /// Try to rotate clockwise in place, returns true if successful
    pub fn rotate_piece(&mut self) -> bool {
        let candidate = self.piece.rotated();
        self.try_replace(candidate)
    }

    /// Try to move by (dx, dy), returns true if successful
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        let candidate = self.piece.shifted(dx, dy);
        self.try_replace(candidate)
    }

    /// Move the piece down one row. If it cannot move, lock it, clear lines
    /// and spawn the next piece. Returns false once the piece has settled.
    pub fn drop_piece(&mut self) -> bool {
        if self.state == GameState::GameOver {
            return false;
        }
        if self.move_piece(0, 1) {
            return true;
        }
        self.lock_piece();
        self.check_lines();
        self.new_piece();
        false
    }

    /// Drop until the piece locks
    pub fn hard_drop(&mut self) {
        while self.drop_piece() {}
    }

    /// Write the current piece into the board
    pub fn lock_piece(&mut self) {
        debug!(
            kind = %self.piece.kind.name(),
            x = self.piece.x,
            y = self.piece.y,
            "locking piece"
        );
        self.board.lock_piece(&self.piece);
    }

    /// Clear full lines, score them and update level and speed.
    /// Returns the number of lines cleared.
    pub fn check_lines(&mut self) -> usize {
        let lines = self.board.clear_lines();
        let level = self.score.level;
        let awarded = self.score.add_clear(lines);

        if lines > 0 {
            info!(lines, awarded, points = self.score.points, "cleared lines");
        }
        if self.score.level != level {
            info!(
                level = self.score.level,
                fall_ms = self.fall_interval().as_millis() as u64,
                "level up"
            );
        }
        lines
    }

    /// Process a player action
    pub fn process_action(&mut self, action: Action) {
        match self.state {
            GameState::NotStarted => {
                // Any key starts the game, the key itself is consumed
                if action != Action::Quit {
                    info!("game started");
                    self.state = GameState::Running;
                    self.since_fall = Duration::ZERO;
                }
            }
            GameState::GameOver => {
                if action == Action::Restart {
                    self.reset();
                }
            }
            GameState::Paused => {
                if action == Action::Pause {
                    self.state = GameState::Running;
                }
            }
            GameState::Running => match action {
                Action::MoveLeft => {
                    self.move_piece(-1, 0);
                }
                Action::MoveRight => {
                    self.move_piece(1, 0);
                }
                Action::SoftDrop => {
                    if self.move_piece(0, 1) {
                        self.score.add_soft_drop();
                    }
                }
                Action::Rotate => {
                    self.rotate_piece();
                }
                Action::HardDrop => {
                    self.hard_drop();
                    self.score.add_hard_drop();
                }
                Action::Pause => {
                    self.state = GameState::Paused;
                }
                // Quit is handled by the main loop
                Action::Start | Action::Restart | Action::Quit => {}
            },
        }
    }

    /// Advance the gravity clock by `elapsed`; drops the piece once the fall
    /// interval has been exceeded
    pub fn tick(&mut self, elapsed: Duration) {
        if self.state != GameState::Running {
            return;
        }
        self.since_fall += elapsed;
        if self.since_fall > self.fall_interval() {
            self.drop_piece();
            self.since_fall = Duration::ZERO;
        }
    }
}
