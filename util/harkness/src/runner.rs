// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test collection and runner module
//!
//! [`run_tests()`] is meant to be the first statement of `main`: when test
//! mode is configured it runs the selected tests registered with
//! `#[def_test]`, prints a summary and exits the process. Otherwise it
//! returns and the program starts normally.
//!
//! ```rust,ignore
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     harkness::run_tests()?;
//!     println!("normal startup");
//!     Ok(())
//! }
//! ```

use std::io::{self, Write};

use crate::{
    config::{self, RunConfig},
    context::{Context, Report, TestStats},
    filter::Filter,
    registry::TestDescriptor,
    theme::{Role, Theme, paint},
};

const RULE: &str = "══════════════════════";

/// Lifecycle of a [`TestRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Initialized,
    Running,
    Summarizing,
    Terminated,
}

/// Walks test descriptors, runs the selected ones and reports to a sink.
pub struct TestRunner<W: Write> {
    filter: Filter,
    theme: &'static dyn Theme,
    sink: W,
    state: RunState,
}

impl TestRunner<io::Stderr> {
    /// A runner reporting to stderr.
    pub fn new(config: &RunConfig) -> Self {
        Self::with_sink(config, io::stderr())
    }
}

impl<W: Write> TestRunner<W> {
    /// A runner reporting to `sink`.
    pub fn with_sink(config: &RunConfig, sink: W) -> Self {
        let mut runner = Self {
            filter: config.filter(),
            theme: config.color.theme(),
            sink,
            state: RunState::Idle,
        };
        if runner.filter.run_all() {
            debug!("selection: every declared test");
        }
        runner.transition(RunState::Initialized);
        runner
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    fn transition(&mut self, next: RunState) {
        debug!("test runner: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run every selected test of `tests`, in the given order, then print
    /// the summary.
    pub fn run<'t>(
        &mut self,
        tests: impl IntoIterator<Item = &'t TestDescriptor>,
    ) -> TestStats {
        self.transition(RunState::Running);
        let theme = self.theme;
        let mut executed = 0;
        let (passed, failed) = {
            let mut ctx = Context::new(Report::new(&mut self.sink, theme));
            for test in tests {
                if test.is_placeholder() {
                    continue;
                }
                if !self.filter.matches(test.name()) {
                    trace!("skipping `{}` ({})", test.name(), test.module());
                    continue;
                }
                ctx.report()
                    .write(format_args!("════ TESTING `{}` ════\n", test.name()));
                test.invoke(&mut ctx);
                ctx.report().write(format_args!("\n"));
                executed += 1;
            }
            (ctx.passed(), ctx.failed())
        };

        if executed == 0 && !self.filter.is_empty() {
            let names: Vec<_> = self.filter.names().collect();
            warn!("no declared test matches the selection {names:?}");
        }

        self.transition(RunState::Summarizing);
        let stats = TestStats {
            passed,
            failed,
            executed,
        };
        self.summarize(&stats);
        stats
    }

    fn summarize(&mut self, stats: &TestStats) {
        let passed = paint(self.theme, Role::Passed, "PASSED");
        let failed = paint(self.theme, Role::Failed, "FAILED");
        let mut report = Report::new(&mut self.sink, self.theme);
        report.write(format_args!("════ TEST SUMMARY ════\n"));
        report.write(format_args!("Tests {passed}: {}\n", stats.passed));
        if stats.all_passed() {
            report.write(format_args!("All tests {passed}!\n"));
        } else {
            report.write(format_args!("Tests {failed}: {}\n", stats.failed));
        }
        report.write(format_args!("{RULE}\n"));
        report.flush();
    }

    /// Finish the run and hand back the sink.
    pub fn finish(mut self) -> W {
        self.transition(RunState::Terminated);
        self.sink
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "test-mode")] {
        use crate::registry;

        impl<W: Write> TestRunner<W> {
            /// Run the selected tests among everything declared with `#[def_test]`.
            pub fn run_registered(&mut self) -> TestStats {
                let tests = registry::tests();
                debug!("{} test descriptors collected", tests.len() - 1);
                self.run(tests)
            }
        }

        /// Run the registered tests selected by `config` without exiting.
        pub fn test_run(config: &RunConfig) -> TestStats {
            let mut runner = TestRunner::new(config);
            let stats = runner.run_registered();
            runner.finish();
            stats
        }

        /// Run the registered tests selected by `config`, then end the process.
        ///
        /// Nothing after this call executes. The exit status comes from
        /// `config.exit_policy`.
        pub fn run_and_exit(config: &RunConfig) -> ! {
            let stats = test_run(config);
            let code = config.exit_policy.code(&stats);
            debug!("test run finished with {stats:?}, exiting with status {code}");
            std::process::exit(code)
        }

        /// Take over the process when test mode is configured in the
        /// environment (see [`crate::config`]). Returns `Ok(())` when it is not.
        pub fn run_tests() -> config::Result<()> {
            match RunConfig::from_env()? {
                Some(config) => run_and_exit(&config),
                None => Ok(()),
            }
        }
    } else {
        /// Test mode is compiled out: always returns so normal startup proceeds.
        pub fn run_tests() -> config::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{check, theme::ColorMode};

    fn pass(ctx: &mut Context<'_>) {
        check!(ctx, true);
    }

    fn fail(ctx: &mut Context<'_>) {
        check!(ctx, false);
    }

    fn run(config: &RunConfig, tests: &[TestDescriptor]) -> (TestStats, String) {
        let mut runner = TestRunner::with_sink(config, Vec::new());
        let stats = runner.run(tests);
        (stats, String::from_utf8(runner.finish()).unwrap())
    }

    #[test]
    fn states_follow_the_lifecycle() {
        let config = RunConfig::all().with_color(ColorMode::Never);
        let mut runner = TestRunner::with_sink(&config, Vec::new());
        assert_eq!(runner.state(), RunState::Initialized);
        runner.run(&[] as &[TestDescriptor]);
        assert_eq!(runner.state(), RunState::Summarizing);
    }

    #[test]
    fn summary_without_failures() {
        let tests = [TestDescriptor::new("p", "m", "f.rs", 1, pass)];
        let (stats, out) = run(&RunConfig::all().with_color(ColorMode::Never), &tests);
        assert_eq!(stats, TestStats { passed: 1, failed: 0, executed: 1 });
        assert!(out.starts_with("════ TESTING `p` ════\n"));
        assert!(out.ends_with(
            "PASSED.\n\n════ TEST SUMMARY ════\nTests PASSED: 1\nAll tests PASSED!\n══════════════════════\n"
        ));
    }

    #[test]
    fn summary_with_failures() {
        let tests = [
            TestDescriptor::new("p", "m", "f.rs", 1, pass),
            TestDescriptor::new("f", "m", "f.rs", 2, fail),
        ];
        let (stats, out) = run(&RunConfig::all().with_color(ColorMode::Never), &tests);
        assert_eq!(stats, TestStats { passed: 1, failed: 1, executed: 2 });
        assert!(out.contains("Tests PASSED: 1\nTests FAILED: 1\n"));
        assert!(!out.contains("All tests"));
    }

    #[test]
    fn unselected_tests_are_silent() {
        let tests = [
            TestDescriptor::new("A", "m", "f.rs", 1, pass),
            TestDescriptor::new("B", "m", "f.rs", 2, fail),
            TestDescriptor::new("C", "m", "f.rs", 3, pass),
        ];
        let (stats, out) = run(&RunConfig::new("A,C").with_color(ColorMode::Never), &tests);
        assert_eq!(stats.executed, 2);
        assert_eq!(stats.failed, 0);
        let a = out.find("TESTING `A`").unwrap();
        let c = out.find("TESTING `C`").unwrap();
        assert!(a < c);
        assert!(!out.contains("`B`"));
    }

    #[test]
    fn duplicate_names_all_run() {
        let tests = [
            TestDescriptor::new("dup", "m", "f.rs", 1, pass),
            TestDescriptor::new("dup", "m", "g.rs", 1, fail),
        ];
        let (stats, _) = run(&RunConfig::new("dup").with_color(ColorMode::Never), &tests);
        assert_eq!(stats, TestStats { passed: 1, failed: 1, executed: 2 });
    }

    #[test]
    fn colored_summary() {
        let (_, out) = run(&RunConfig::all().with_color(ColorMode::Always), &[]);
        assert!(out.contains("Tests \u{1B}[32mPASSED\u{1B}[0m: 0\n"));
    }

    #[cfg(feature = "test-mode")]
    #[crate::def_test(in_crate)]
    fn declared_in_crate(ctx: &mut Context<'_>) {
        check!(ctx, true);
    }

    #[cfg(feature = "test-mode")]
    #[test]
    fn registered_tests_are_found() {
        let config = RunConfig::new("in_crate").with_color(ColorMode::Never);
        let mut runner = TestRunner::with_sink(&config, Vec::new());
        let stats = runner.run_registered();
        assert_eq!(stats, TestStats { passed: 1, failed: 0, executed: 1 });
        let out = String::from_utf8(runner.finish()).unwrap();
        assert!(out.starts_with("════ TESTING `in_crate` ════\n"));
    }

    #[cfg(feature = "test-mode")]
    #[test]
    fn placeholder_never_runs() {
        let config = RunConfig::all().with_color(ColorMode::Never);
        let placeholder = crate::registry::tests()
            .into_iter()
            .find(|t| t.is_placeholder())
            .unwrap();
        let (stats, out) = run(&config, &[*placeholder]);
        assert_eq!(stats, TestStats::new());
        assert!(out.starts_with("════ TEST SUMMARY ════\n"));
        assert!(out.contains("All tests PASSED!"));
    }
}
