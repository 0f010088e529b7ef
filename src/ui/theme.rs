//! Light and dark color palettes.
//!
//! The active [`Theme`] is a plain value owned by the app and handed to every
//! render function; toggling swaps the value.

use ratatui::style::Color;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

impl FromStr for ThemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeKind::Light),
            "dark" => Ok(ThemeKind::Dark),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub bg: Color,
    pub text: Color,
    pub card_bg: Color,
    pub card_text: Color,
    pub muted: Color,
    pub accent: Color,
    pub focus_border: Color,
    pub error: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            bg: Color::Rgb(0xF2, 0xF3, 0xF5),
            text: Color::Rgb(0x33, 0x33, 0x33),
            card_bg: Color::Rgb(0xFF, 0xFF, 0xFF),
            card_text: Color::Rgb(0x22, 0x22, 0x22),
            muted: Color::Rgb(0x88, 0x88, 0x88),
            accent: Color::Rgb(0x4A, 0x90, 0xE2),
            focus_border: Color::Rgb(0x4A, 0x90, 0xE2),
            error: Color::Rgb(0xD0, 0x3B, 0x3B),
        }
    }

    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            bg: Color::Rgb(0x10, 0x10, 0x10),
            text: Color::Rgb(0xE0, 0xE0, 0xE0),
            card_bg: Color::Rgb(0x1E, 0x1E, 0x1E),
            card_text: Color::Rgb(0xFF, 0xFF, 0xFF),
            muted: Color::Rgb(0x9A, 0x9A, 0x9A),
            accent: Color::Rgb(0x4A, 0x90, 0xE2),
            focus_border: Color::Rgb(0x4A, 0x90, 0xE2),
            error: Color::Rgb(0xF0, 0x6A, 0x6A),
        }
    }

    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::light(),
            ThemeKind::Dark => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        match self.kind {
            ThemeKind::Light => Self::dark(),
            ThemeKind::Dark => Self::light(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
