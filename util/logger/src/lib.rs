// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! `log` backend for programs hosting harkness tests.
//!
//! Records go to stderr, next to the test report, one line each:
//! `[2025-01-01 12:00:00.000000 target:line] message`.

use core::{
    fmt::{self, Write},
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};
use std::io::Write as _;

use harkness::{ColorMode, theme::AnsiColor};
use log::{Level, LevelFilter, Log, Metadata, Record};
pub use log::{debug, error, info, trace, warn};

macro_rules! color_fmt {
    ($color_code:expr, $($arg:tt)*) => {
        format_args!("\u{1B}[{}m{}\u{1B}[m", $color_code as u8, format_args!($($arg)*))
    };
}

static COLORED: AtomicBool = AtomicBool::new(false);

struct HarnessLogger;

impl Write for HarnessLogger {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        std::io::stderr()
            .lock()
            .write_all(s.as_bytes())
            .map_err(|_| fmt::Error)
    }
}

fn level_color(level: Level) -> AnsiColor {
    match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Green,
        Level::Debug => AnsiColor::Cyan,
        Level::Trace => AnsiColor::BrightBlack,
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "timestamps")] {
        fn line_prefix(path: &str, line: u32) -> String {
            let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
            format!("{time} {path}:{line}")
        }
    } else {
        fn line_prefix(path: &str, line: u32) -> String {
            format!("{path}:{line}")
        }
    }
}

impl Log for HarnessLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let prefix = line_prefix(record.target(), record.line().unwrap_or(0));

        let _ = if COLORED.load(Ordering::Relaxed) {
            print_fmt(color_fmt!(
                AnsiColor::White,
                "[{prefix}] {args}\n",
                args = color_fmt!(level_color(record.level()), "{}", record.args()),
            ))
        } else {
            print_fmt(format_args!("[{prefix}] {}\n", record.args()))
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Write preformatted text to stderr as one unit.
pub fn print_fmt(args: fmt::Arguments) -> fmt::Result {
    let text = args.to_string();
    HarnessLogger.write_str(&text)
}

/// Install the logger with the `Warn` level. Colors follow `color`.
///
/// Fails when another logger is already installed.
pub fn init_logger(color: ColorMode) -> Result<(), log::SetLoggerError> {
    COLORED.store(color.enabled(), Ordering::Relaxed);
    log::set_logger(&HarnessLogger)?;
    log::set_max_level(LevelFilter::Warn);
    Ok(())
}

/// Set the maximum level from its name (`"trace"`, `"info"`, ...).
/// Unknown names turn logging off.
pub fn set_log_level(level: &str) {
    let lf = LevelFilter::from_str(level)
        .ok()
        .unwrap_or(LevelFilter::Off);
    log::set_max_level(lf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_parsed() {
        set_log_level("debug");
        assert_eq!(log::max_level(), LevelFilter::Debug);
        set_log_level("TRACE");
        assert_eq!(log::max_level(), LevelFilter::Trace);
        set_log_level("chatty");
        assert_eq!(log::max_level(), LevelFilter::Off);
    }

    #[test]
    fn levels_map_to_distinct_colors() {
        let colors = [
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ]
        .map(level_color);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn color_fmt_wraps_arguments() {
        let text = color_fmt!(AnsiColor::Red, "{}-{}", 1, 2).to_string();
        assert_eq!(text, "\u{1B}[31m1-2\u{1B}[m");
    }

    #[test]
    fn preformatted_text_reaches_stderr() {
        assert!(print_fmt(format_args!("{}\n", "logger ready")).is_ok());
    }
}
