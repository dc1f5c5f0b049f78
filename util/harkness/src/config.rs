// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Run configuration.
//!
//! | variable | meaning |
//! |---|---|
//! | `HARKNESS_TEST` | comma-separated names of the tests to run |
//! | `HARKNESS_TEST_ALL` | run every test, whatever `HARKNESS_TEST` says |
//! | `HARKNESS_COLOR` | `auto`, `always` or `never` |
//! | `NO_COLOR` | any non-empty value forces plain output |
//! | `HARKNESS_STRICT_EXIT` | exit with status 1 when an assertion failed |
//!
//! A variable missing at run time falls back to its value at build time, so
//! `HARKNESS_TEST=a,b cargo build` bakes a selection into the binary.

use core::fmt;

use crate::{context::TestStats, filter::Filter, theme::ColorMode};

pub const TEST_VAR: &str = "HARKNESS_TEST";
pub const TEST_ALL_VAR: &str = "HARKNESS_TEST_ALL";
pub const COLOR_VAR: &str = "HARKNESS_COLOR";
pub const NO_COLOR_VAR: &str = "NO_COLOR";
pub const STRICT_EXIT_VAR: &str = "HARKNESS_STRICT_EXIT";

/// Errors from reading the run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A boolean variable held something other than a recognised flag value
    InvalidBool { var: &'static str, value: String },
    /// The color mode was not `auto`, `always` or `never`
    InvalidColor { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBool { var, value } => {
                write!(f, "{var}: expected a boolean flag, found {value:?}")
            }
            ConfigError::InvalidColor { value } => write!(
                f,
                "{COLOR_VAR}: expected `auto`, `always` or `never`, found {value:?}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub type Result<T> = core::result::Result<T, ConfigError>;

/// Process exit status once the summary has been printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Always exit with status 0, even when assertions failed.
    #[default]
    AlwaysSuccess,
    /// Exit with status 1 when any assertion failed.
    FailOnError,
}

impl ExitPolicy {
    pub fn code(self, stats: &TestStats) -> i32 {
        match self {
            ExitPolicy::FailOnError if !stats.all_passed() => 1,
            _ => 0,
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// Comma-separated test names.
    pub selection: String,
    /// Run every declared test.
    pub run_all: bool,
    pub color: ColorMode,
    pub exit_policy: ExitPolicy,
}

impl RunConfig {
    /// Select the tests named in `selection`.
    pub fn new(selection: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            ..Self::default()
        }
    }

    /// Select every declared test.
    pub fn all() -> Self {
        Self {
            run_all: true,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn with_exit_policy(mut self, exit_policy: ExitPolicy) -> Self {
        self.exit_policy = exit_policy;
        self
    }

    /// The selection filter for this configuration.
    pub fn filter(&self) -> Filter {
        Filter::parse(&self.selection, self.run_all)
    }

    /// Read the configuration from the process environment.
    ///
    /// Returns `Ok(None)` when test mode is off, i.e. neither a selection nor
    /// `HARKNESS_TEST_ALL` is present.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(env_lookup)
    }

    /// Like [`RunConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let selection = lookup(TEST_VAR);
        let run_all = parse_flag(TEST_ALL_VAR, lookup(TEST_ALL_VAR))?;
        if selection.is_none() && !run_all {
            return Ok(None);
        }

        let config = Self {
            selection: selection.unwrap_or_default(),
            run_all,
            ..Self::default()
        };
        config.with_settings_from(&lookup).map(Some)
    }

    /// Apply `HARKNESS_COLOR`, `NO_COLOR` and `HARKNESS_STRICT_EXIT` from the
    /// environment to a selection made elsewhere, e.g. on a command line.
    pub fn with_env_settings(self) -> Result<Self> {
        self.with_settings_from(env_lookup)
    }

    /// Like [`RunConfig::with_env_settings`], reading variables through `lookup`.
    pub fn with_settings_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup(COLOR_VAR) {
            self.color = ColorMode::parse(&value).ok_or(ConfigError::InvalidColor { value })?;
        }
        if lookup(NO_COLOR_VAR).is_some_and(|v| !v.is_empty()) {
            self.color = ColorMode::Never;
        }
        if parse_flag(STRICT_EXIT_VAR, lookup(STRICT_EXIT_VAR))? {
            self.exit_policy = ExitPolicy::FailOnError;
        }
        Ok(self)
    }
}

fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .or_else(|| build_time(var).map(String::from))
}

fn build_time(var: &str) -> Option<&'static str> {
    match var {
        TEST_VAR => option_env!("HARKNESS_TEST"),
        TEST_ALL_VAR => option_env!("HARKNESS_TEST_ALL"),
        COLOR_VAR => option_env!("HARKNESS_COLOR"),
        NO_COLOR_VAR => option_env!("NO_COLOR"),
        STRICT_EXIT_VAR => option_env!("HARKNESS_STRICT_EXIT"),
        _ => None,
    }
}

/// Parse a boolean flag. A missing or empty value is `false`.
pub fn parse_flag(var: &'static str, value: Option<String>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_mode_off_without_selection() {
        assert_eq!(RunConfig::from_lookup(lookup(&[])), Ok(None));
        assert_eq!(
            RunConfig::from_lookup(lookup(&[(TEST_ALL_VAR, "0"), (COLOR_VAR, "never")])),
            Ok(None)
        );
    }

    #[test]
    fn empty_selection_still_enables_test_mode() {
        let config = RunConfig::from_lookup(lookup(&[(TEST_VAR, "")])).unwrap().unwrap();
        assert_eq!(config.selection, "");
        assert!(!config.run_all);
        assert!(config.filter().is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let config = RunConfig::from_lookup(lookup(&[
            (TEST_VAR, "a,b"),
            (TEST_ALL_VAR, "yes"),
            (COLOR_VAR, "Always"),
            (STRICT_EXIT_VAR, "1"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.selection, "a,b");
        assert!(config.run_all);
        assert_eq!(config.color, ColorMode::Always);
        assert_eq!(config.exit_policy, ExitPolicy::FailOnError);
    }

    #[test]
    fn no_color_wins_over_color_mode() {
        let config = RunConfig::from_lookup(lookup(&[
            (TEST_ALL_VAR, "true"),
            (COLOR_VAR, "always"),
            (NO_COLOR_VAR, "1"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.color, ColorMode::Never);

        let config = RunConfig::from_lookup(lookup(&[(TEST_ALL_VAR, "on"), (NO_COLOR_VAR, "")]))
            .unwrap()
            .unwrap();
        assert_eq!(config.color, ColorMode::Auto);
    }

    #[test]
    fn settings_apply_to_an_outside_selection() {
        let config = RunConfig::all()
            .with_settings_from(lookup(&[(COLOR_VAR, "always"), (STRICT_EXIT_VAR, "on")]))
            .unwrap();
        assert!(config.run_all);
        assert_eq!(config.color, ColorMode::Always);
        assert_eq!(config.exit_policy, ExitPolicy::FailOnError);

        let config = RunConfig::new("a")
            .with_color(ColorMode::Always)
            .with_settings_from(lookup(&[(NO_COLOR_VAR, "1")]))
            .unwrap();
        assert_eq!(config.selection, "a");
        assert_eq!(config.color, ColorMode::Never);

        let untouched = RunConfig::new("a").with_settings_from(lookup(&[])).unwrap();
        assert_eq!(untouched, RunConfig::new("a"));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            RunConfig::from_lookup(lookup(&[(TEST_ALL_VAR, "maybe")])),
            Err(ConfigError::InvalidBool {
                var: TEST_ALL_VAR,
                value: "maybe".into()
            })
        );
        let err = RunConfig::from_lookup(lookup(&[(TEST_VAR, "a"), (COLOR_VAR, "rainbow")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidColor { value: "rainbow".into() });
        assert!(err.to_string().contains("rainbow"));
    }

    #[test]
    fn exit_codes() {
        let clean = TestStats {
            passed: 4,
            failed: 0,
            executed: 2,
        };
        let broken = TestStats {
            passed: 1,
            failed: 2,
            executed: 2,
        };
        assert_eq!(ExitPolicy::AlwaysSuccess.code(&broken), 0);
        assert_eq!(ExitPolicy::FailOnError.code(&clean), 0);
        assert_eq!(ExitPolicy::FailOnError.code(&broken), 1);
    }
}
