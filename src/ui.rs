//! Terminal UI rendering with ratatui

use crate::board::Cell;
use crate::game::{Game, GameState};
use crate::settings::Settings;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Width of the score / controls panel
const INFO_WIDTH: u16 = 24;

const CONTROLS: [(&str, &str); 7] = [
    ("← →", "Move"),
    ("↑", "Rotate"),
    ("↓", "Soft drop"),
    ("Space", "Hard drop"),
    ("P", "Pause"),
    ("R", "Restart"),
    ("Q", "Quit"),
];

/// Render the whole screen for the current game state
pub fn render(frame: &mut Frame, game: &Game, settings: &Settings) {
    if game.state() == GameState::NotStarted {
        render_start_screen(frame);
        return;
    }

    render_game(frame, game, settings);

    let area = frame.area();
    match game.state() {
        GameState::Paused => render_overlay(frame, area, "PAUSED", &["Press P to resume".to_string()]),
        GameState::GameOver => render_overlay(
            frame,
            area,
            "GAME OVER",
            &[
                format!("Final score: {}", game.score().points),
                "Press R to restart".to_string(),
            ],
        ),
        GameState::NotStarted | GameState::Running => {}
    }
}

/// Render the title screen shown before the first key press
fn render_start_screen(frame: &mut Frame) {
    let area = center_rect(frame.area(), 40, 7);
    let lines = vec![
        Line::styled("FALLBLOCK", Style::default().fg(Color::Cyan).bold()),
        Line::raw(""),
        Line::raw(""),
        Line::styled("Press any key to start", Style::default().fg(Color::White)),
    ];
    let title = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    frame.render_widget(title, area);
}

/// Render board and info panel side by side
fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let board = game.board();
    let board_width = board.width() as u16 * 2 + 2;
    let board_height = board.height() as u16 + 2;

    let game_area = center_rect(frame.area(), board_width + INFO_WIDTH, board_height);
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(INFO_WIDTH)])
        .split(game_area);

    render_board(frame, layout[0], game, settings);
    render_info(frame, layout[1], game);
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board with the falling piece and optional ghost
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece = game.piece();
    let piece_cells: Vec<_> = piece.block_positions().collect();
    let ghost_cells: Vec<_> = if settings.visual.show_ghost {
        game.ghost().block_positions().collect()
    } else {
        Vec::new()
    };

    let lines: Vec<Line> = game
        .board()
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let pos = (row as i32, col as i32);
                    if piece_cells.contains(&pos) {
                        Span::styled(block_char, Style::default().fg(piece.color()))
                    } else if let Cell::Filled(color) = cell {
                        Span::styled(block_char, Style::default().fg(*color))
                    } else if ghost_cells.contains(&pos) {
                        Span::styled(ghost_char, Style::default().fg(piece.color()).dim())
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render score, level and the controls help
fn render_info(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = game.score();
    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            score.level.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            score.lines.to_string(),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::from(Span::styled("CONTROLS", Style::default().fg(Color::Gray))),
    ];
    lines.extend(CONTROLS.iter().map(|(key, what)| {
        Line::from(vec![
            Span::styled(format!("{:<6}", key), Style::default().fg(Color::Magenta)),
            Span::raw(*what),
        ])
    }));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &[String]) {
    let popup_width = 26u16;
    let popup_height = 4 + subtitle.len() as u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
    ];
    text.extend(
        subtitle
            .iter()
            .map(|line| Line::styled(line.clone(), Style::default().fg(Color::Gray))),
    );

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Action;
    use crate::randomizer::Randomizer;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(game: &Game) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        terminal
            .draw(|frame| render(frame, game, &Settings::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn new_game() -> Game {
        Game::new(10, 20, Box::new(Randomizer::with_seed(1)))
    }

    #[test]
    fn test_start_screen() {
        let text = screen_text(&new_game());
        assert!(text.contains("Press any key to start"));
    }

    #[test]
    fn test_running_shows_score() {
        let mut game = new_game();
        game.process_action(Action::Start);
        let text = screen_text(&game);
        assert!(text.contains("SCORE"));
        assert!(text.contains("LEVEL"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_pause_overlay() {
        let mut game = new_game();
        game.process_action(Action::Start);
        game.process_action(Action::Pause);
        assert!(screen_text(&game).contains("PAUSED"));
    }

    #[test]
    fn test_center_rect_clamps() {
        let area = Rect::new(0, 0, 10, 10);
        let centered = center_rect(area, 20, 4);
        assert_eq!(centered, Rect::new(0, 3, 10, 4));
    }
}
