//! Keyboard input mapping
//!
//! Turns crossterm key events into game actions using the configured bindings.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let key = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "esc" | "escape" => KeyCode::Esc,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let key = Self::parse_key(s);
                if key.is_none() {
                    tracing::warn!("ignoring unknown key name {:?}", s);
                }
                key
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            pause: Self::parse_keys(&settings.keys.pause),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Maps key presses to actions
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
        }
    }

    /// Map a key press to an action. Unbound keys map to `Action::Start`.
    pub fn key_down(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        let code = normalize_key(key.code);
        let b = &self.bindings;

        if b.quit.contains(&code) {
            Action::Quit
        } else if b.move_left.contains(&code) {
            Action::MoveLeft
        } else if b.move_right.contains(&code) {
            Action::MoveRight
        } else if b.soft_drop.contains(&code) {
            Action::SoftDrop
        } else if b.hard_drop.contains(&code) {
            Action::HardDrop
        } else if b.rotate.contains(&code) {
            Action::Rotate
        } else if b.pause.contains(&code) {
            Action::Pause
        } else if b.restart.contains(&code) {
            Action::Restart
        } else {
            Action::Start
        }
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Left)), Action::MoveLeft);
        assert_eq!(input.key_down(press(KeyCode::Right)), Action::MoveRight);
        assert_eq!(input.key_down(press(KeyCode::Down)), Action::SoftDrop);
        assert_eq!(input.key_down(press(KeyCode::Up)), Action::Rotate);
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), Action::HardDrop);
        assert_eq!(input.key_down(press(KeyCode::Char('p'))), Action::Pause);
        assert_eq!(input.key_down(press(KeyCode::Char('r'))), Action::Restart);
        assert_eq!(input.key_down(press(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_uppercase_matches() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Char('P'))), Action::Pause);
    }

    #[test]
    fn test_unbound_key_starts() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Char('k'))), Action::Start);
        assert_eq!(input.key_down(press(KeyCode::Enter)), Action::Start);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let input = InputHandler::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(key), Action::Quit);
    }

    #[test]
    fn test_custom_bindings() {
        let mut settings = Settings::default();
        settings.keys.rotate = vec!["x".to_string(), "Up".to_string()];
        settings.keys.hard_drop = vec!["Enter".to_string(), "bogus".to_string()];
        let input = InputHandler::from_settings(&settings);
        assert_eq!(input.key_down(press(KeyCode::Char('x'))), Action::Rotate);
        assert_eq!(input.key_down(press(KeyCode::Enter)), Action::HardDrop);
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), Action::Start);
    }
}
