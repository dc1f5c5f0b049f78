// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Demo host program.
//!
//! Starting it with `--test <names>` or `--test-all` (or the matching
//! `HARKNESS_*` environment variables) runs the declared tests and exits;
//! otherwise the program starts normally.

#[macro_use]
extern crate log;

mod math;
mod tests;

use std::error::Error;

use clap::Parser;
use harkness::{ColorMode, ExitPolicy, RunConfig};

/// Demonstration host for harkness tests.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Comma-separated names of the tests to run
    #[arg(long, value_name = "NAMES")]
    test: Option<String>,

    /// Run every declared test
    #[arg(long)]
    test_all: bool,

    /// Decorate the report with ANSI colors: auto, always or never
    #[arg(long, value_parser = parse_color)]
    color: Option<ColorMode>,

    /// Exit with status 1 when an assertion failed
    #[arg(long)]
    strict_exit: bool,

    /// Maximum log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_color(value: &str) -> Result<ColorMode, String> {
    ColorMode::parse(value).ok_or_else(|| format!("unknown color mode `{value}`"))
}

impl Cli {
    /// The test mode configuration, from the command line when it selects
    /// anything, from the environment otherwise. Color and exit settings
    /// from the environment apply either way; flags override them.
    fn run_config(&self) -> harkness::config::Result<Option<RunConfig>> {
        let mut config = if self.test.is_some() || self.test_all {
            RunConfig {
                selection: self.test.clone().unwrap_or_default(),
                run_all: self.test_all,
                ..RunConfig::default()
            }
            .with_env_settings()?
        } else {
            match RunConfig::from_env()? {
                Some(config) => config,
                None => return Ok(None),
            }
        };
        if let Some(color) = self.color {
            config.color = color;
        }
        if self.strict_exit {
            config.exit_policy = ExitPolicy::FailOnError;
        }
        Ok(Some(config))
    }
}

#[cfg(feature = "test-mode")]
fn take_over(config: &RunConfig) -> ! {
    harkness::run_and_exit(config)
}

#[cfg(not(feature = "test-mode"))]
fn take_over(config: &RunConfig) {
    warn!("built without test mode, ignoring test selection {config:?}");
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.run_config()?;

    let color = config.as_ref().map_or(ColorMode::Auto, |c| c.color);
    harkness_logger::init_logger(color)?;
    harkness_logger::set_log_level(&cli.log_level);

    if let Some(config) = config {
        info!("entering test mode");
        take_over(&config);
    }

    println!("This shouldn't run when we're testing!!");
    println!("foo(6, 10) = {}", math::foo(6, 10));
    println!("find(b\"harkness\", b'k') = {:?}", math::find(b"harkness", b'k'));
    println!("average([1, 2, 3]) = {}", math::average(&[1.0, 2.0, 3.0]));
    println!("initial(\"harkness\") = {:?}", math::initial("harkness"));
    Ok(())
}
