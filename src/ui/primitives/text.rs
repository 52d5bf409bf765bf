use crossterm::style::{Color, Stylize};

use crate::ui::theme;

/// Semantic color of a piece of console text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Success => theme::colors::SUCCESS,
            Tone::Error => theme::colors::ERROR,
            Tone::Warning => theme::colors::WARNING,
            Tone::Info => theme::colors::INFO,
            Tone::Dim => theme::colors::DIM,
        }
    }
}

/// Color `text` when the terminal supports it
pub fn paint(text: &str, tone: Tone, supports_color: bool) -> String {
    if supports_color {
        format!("{}", text.with(tone.color()))
    } else {
        text.to_string()
    }
}

/// Bold `text` when the terminal supports it
pub fn strong(text: &str, supports_color: bool) -> String {
    if supports_color {
        format!("{}", text.bold())
    } else {
        text.to_string()
    }
}
