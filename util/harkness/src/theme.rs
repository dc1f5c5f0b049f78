// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Colorized and plain rendering of report fragments.
//!
//! A [`Theme`] is picked once from the [`ColorMode`] and handed down to the
//! runner and to every assertion. Both themes produce the same text; the ANSI
//! one only wraps fragments in escape sequences.

use core::fmt;
use std::io::IsTerminal;

/// ANSI foreground color codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    Black         = 30,
    Red           = 31,
    Green         = 32,
    Yellow        = 33,
    Blue          = 34,
    Magenta       = 35,
    Cyan          = 36,
    White         = 37,
    BrightBlack   = 90,
    BrightRed     = 91,
    BrightGreen   = 92,
    BrightYellow  = 93,
    BrightBlue    = 94,
    BrightMagenta = 95,
    BrightCyan    = 96,
    BrightWhite   = 97,
}

impl AnsiColor {
    pub const RESET: &'static str = "\u{1B}[0m";
}

/// What a report fragment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Source text of a checked expression, shown in backticks.
    Literal,
    /// An evaluated value, shown in backticks.
    Value,
    /// String contents, shown in double quotes.
    Str,
    /// The `PASSED` marker.
    Passed,
    /// The `FAILED` marker.
    Failed,
}

impl Role {
    fn delimiter(self) -> &'static str {
        match self {
            Role::Literal | Role::Value => "`",
            Role::Str => "\"",
            Role::Passed | Role::Failed => "",
        }
    }
}

/// Decides how each [`Role`] is decorated.
pub trait Theme: Sync {
    /// Color used for `role`, or `None` for undecorated output.
    fn color(&self, role: Role) -> Option<AnsiColor>;
}

/// Terminal output with ANSI escapes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiTheme;

impl Theme for AnsiTheme {
    fn color(&self, role: Role) -> Option<AnsiColor> {
        Some(match role {
            Role::Literal => AnsiColor::Magenta,
            Role::Value => AnsiColor::Yellow,
            Role::Str => AnsiColor::Cyan,
            Role::Passed => AnsiColor::Green,
            Role::Failed => AnsiColor::Red,
        })
    }
}

/// Escape-free output for files and pipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTheme;

impl Theme for PlainTheme {
    fn color(&self, _role: Role) -> Option<AnsiColor> {
        None
    }
}

static ANSI: AnsiTheme = AnsiTheme;
static PLAIN: PlainTheme = PlainTheme;

/// A fragment rendered through a theme.
pub struct Painted<'t, T: ?Sized> {
    theme: &'t dyn Theme,
    role: Role,
    body: &'t T,
}

/// Render `body` as `role` using `theme`.
pub fn paint<'t, T: fmt::Display + ?Sized>(
    theme: &'t dyn Theme,
    role: Role,
    body: &'t T,
) -> Painted<'t, T> {
    Painted { theme, role, body }
}

impl<T: fmt::Display + ?Sized> fmt::Display for Painted<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delim = self.role.delimiter();
        match self.theme.color(self.role) {
            Some(color) => write!(
                f,
                "\u{1B}[{}m{delim}{}{delim}{}",
                color as u8,
                self.body,
                AnsiColor::RESET
            ),
            None => write!(f, "{delim}{}{delim}", self.body),
        }
    }
}

/// How report output should be decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Colors when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Parse `auto`, `always` or `never`, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    /// Whether this mode produces escape sequences on the current stderr.
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// The theme for this mode.
    pub fn theme(self) -> &'static dyn Theme {
        if self.enabled() { &ANSI } else { &PLAIN }
    }
}
