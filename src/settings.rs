//! Settings loaded from TOML
//!
//! Read from ~/.config/fallblock/settings.toml (or platform equivalent), or
//! from a file passed on the command line.

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};

/// Smallest and largest accepted board side
const MIN_BOARD_SIDE: usize = 4;
const MAX_BOARD_SIDE: usize = 64;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Board dimensions
    pub board: BoardSettings,
    /// Visual settings
    pub visual: VisualSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Board dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Show where the piece will land
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate: vec!["Up".to_string()],
            pause: vec!["p".to_string()],
            restart: vec!["r".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: false,
            block_style: "solid".to_string(),
        }
    }
}

impl Settings {
    /// Get the default settings file path
    fn settings_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "fallblock", "fallblock")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Load settings from an explicit file, or from the default location.
    ///
    /// An explicit file must exist and parse. A broken default file is
    /// logged and replaced by defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings from {}", path.display()))?;
            return Self::from_toml(&contents)
                .with_context(|| format!("invalid settings in {}", path.display()));
        }

        let Some(path) = Self::settings_path() else {
            return Ok(Self::default());
        };
        let Ok(contents) = fs::read_to_string(&path) else {
            tracing::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        };
        match Self::from_toml(&contents) {
            Ok(settings) => {
                tracing::info!("loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("ignoring settings in {}: {:#}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents).context("failed to parse TOML")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let BoardSettings { width, height } = self.board;
        let range = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !range.contains(&width) || !range.contains(&height) {
            bail!(
                "board must be between {MIN_BOARD_SIDE}x{MIN_BOARD_SIDE} and \
                 {MAX_BOARD_SIDE}x{MAX_BOARD_SIDE}, got {width}x{height}"
            );
        }
        Ok(())
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.board.width, 10);
        assert_eq!(settings.board.height, 20);
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml(
            r#"
            [board]
            width = 12

            [visual]
            show_ghost = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.board.width, 12);
        assert_eq!(settings.board.height, 20);
        assert!(settings.visual.show_ghost);
        assert_eq!(settings.visual.block_style, "solid");
    }

    #[test]
    fn test_keys_string_or_list() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            rotate = ["Up", "x"]
            hard_drop = "Enter"
            "#,
        )
        .unwrap();
        assert_eq!(settings.keys.rotate, vec!["Up", "x"]);
        assert_eq!(settings.keys.hard_drop, vec!["Enter"]);
        assert_eq!(settings.keys.move_left, vec!["Left"]);
    }

    #[test]
    fn test_round_trip_keeps_settings() {
        let mut settings = Settings::default();
        settings.keys.rotate.push("x".to_string());
        settings.visual.block_style = "round".to_string();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_rejects_tiny_board() {
        let err = Settings::from_toml("[board]\nwidth = 2\n").unwrap_err();
        assert!(err.to_string().contains("board must be"));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(Settings::from_toml("[board\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("fallblock-no-such-settings.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars(), ("██", "░░"));
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars().0, "[]");
    }
}
