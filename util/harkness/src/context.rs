// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Per-run counters and the report stream they are written through.

use core::fmt;
use std::io::Write;

use crate::theme::{Role, Theme, paint};

/// Where report lines go, and how they are decorated.
pub struct Report<'a> {
    sink: &'a mut dyn Write,
    theme: &'a dyn Theme,
}

impl<'a> Report<'a> {
    pub fn new(sink: &'a mut dyn Write, theme: &'a dyn Theme) -> Self {
        Self { sink, theme }
    }

    pub fn theme(&self) -> &'a dyn Theme {
        self.theme
    }

    /// Append formatted text. The sink is an external collaborator, so write
    /// errors are dropped.
    pub fn write(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.sink.write_fmt(args);
    }

    pub fn flush(&mut self) {
        let _ = self.sink.flush();
    }

    pub(crate) fn passed(&mut self) {
        let theme = self.theme;
        self.write(format_args!("{}.\n", paint(theme, Role::Passed, "PASSED")));
    }

    pub(crate) fn failed(&mut self, detail: Option<fmt::Arguments<'_>>) {
        let theme = self.theme;
        let marker = paint(theme, Role::Failed, "FAILED");
        match detail {
            Some(detail) => self.write(format_args!("{marker}: {detail}\n")),
            None => self.write(format_args!("{marker}.\n")),
        }
    }
}

/// Shared state of one test run.
///
/// Test bodies receive it by `&mut` and hand it to the `check*!` macros. The
/// counters only move through assertions, one step per assertion.
pub struct Context<'a> {
    passed: usize,
    failed: usize,
    report: Report<'a>,
}

impl<'a> Context<'a> {
    /// A context with both counters at zero.
    pub fn new(report: Report<'a>) -> Self {
        Self {
            passed: 0,
            failed: 0,
            report,
        }
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn theme(&self) -> &'a dyn Theme {
        self.report.theme()
    }

    pub(crate) fn report(&mut self) -> &mut Report<'a> {
        &mut self.report
    }

    pub(crate) fn record_pass(&mut self) {
        self.passed += 1;
        self.report.passed();
    }

    pub(crate) fn record_fail(&mut self, detail: Option<fmt::Arguments<'_>>) {
        self.failed += 1;
        self.report.failed(detail);
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("passed", &self.passed)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

/// Final counters of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestStats {
    /// Assertions that held.
    pub passed: usize,
    /// Assertions that did not hold.
    pub failed: usize,
    /// Test bodies that were invoked.
    pub executed: usize,
}

impl TestStats {
    pub const fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            executed: 0,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ColorMode;

    #[test]
    fn fresh_context_starts_at_zero() {
        let mut out = Vec::new();
        let ctx = Context::new(Report::new(&mut out, ColorMode::Never.theme()));
        assert_eq!((ctx.passed(), ctx.failed()), (0, 0));
    }

    #[test]
    fn each_record_moves_one_counter() {
        let mut out = Vec::new();
        {
            let mut ctx = Context::new(Report::new(&mut out, ColorMode::Never.theme()));
            ctx.record_pass();
            assert_eq!((ctx.passed(), ctx.failed()), (1, 0));
            ctx.record_fail(None);
            assert_eq!((ctx.passed(), ctx.failed()), (1, 1));
            ctx.record_fail(Some(format_args!("{} != {}", 1, 2)));
            assert_eq!((ctx.passed(), ctx.failed()), (1, 2));
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PASSED.\nFAILED.\nFAILED: 1 != 2\n"
        );
    }
}
