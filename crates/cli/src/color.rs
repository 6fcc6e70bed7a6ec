// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use rb_core::{RunStatus, StatusTone};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Muted / secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// Running
    pub const PRIMARY: u8 = 75;
    /// Finished successfully
    pub const SUCCESS: u8 = 114;
    /// Finished with an error
    pub const DANGER: u8 = 203;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("{}{}{}", fg256(code), text, RESET)
    } else {
        text.to_string()
    }
}

/// Format text with the header color (steel blue).
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Format text with the literal color (light grey).
pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

/// Format text with the context color (medium grey).
pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

/// Format text with the muted color (darker grey).
pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

pub fn tone_code(tone: StatusTone) -> u8 {
    match tone {
        StatusTone::Secondary => codes::CONTEXT,
        StatusTone::Primary => codes::PRIMARY,
        StatusTone::Success => codes::SUCCESS,
        StatusTone::Danger => codes::DANGER,
    }
}

/// Paint `text` in the tone of the status it names. Text that is not a
/// known status is left plain.
pub fn status(text: &str) -> String {
    match parse_status(text) {
        Some(s) => paint(tone_code(s.tone()), text),
        None => text.to_string(),
    }
}

fn parse_status(text: &str) -> Option<RunStatus> {
    match text {
        "Pending" => Some(RunStatus::Pending),
        "Running" => Some(RunStatus::Running),
        "Success" => Some(RunStatus::Success),
        "Error" => Some(RunStatus::Error),
        _ => None,
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
