// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! An embeddable unit-testing engine.
//!
//! Functions marked with [`def_test`] are collected automatically. When the
//! host program calls [`run_tests()`] with test mode configured, the selected
//! tests run, a summary is printed to stderr and the process exits before
//! normal startup continues.
//!
//! ```rust,ignore
//! use harkness::{Context, check_int, def_test};
//!
//! fn foo(a: i32, b: i32) -> i32 {
//!     if a < 5 { b } else { a }
//! }
//!
//! #[def_test(foo)]
//! fn foo_returns_a_when_large(ctx: &mut Context) {
//!     check_int!(ctx, foo(6, 10), ==, 6);
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     harkness::run_tests()?;
//!     println!("normal startup");
//!     Ok(())
//! }
//! ```
//!
//! With the `test-mode` feature disabled, declarations compile to nothing and
//! [`run_tests()`] always returns.

#[macro_use]
extern crate log;

// Lets `#[def_test]` expansions name `::harkness` from inside this crate.
extern crate self as harkness;

pub mod assert;
pub mod config;
pub mod context;
pub mod filter;
pub mod registry;
pub mod runner;
pub mod theme;

pub use config::{ConfigError, ExitPolicy, RunConfig};
pub use context::{Context, Report, TestStats};
pub use filter::Filter;
pub use harkness_macros::{def_test, mod_test};
pub use registry::{TestDescriptor, TestFn};
pub use runner::{RunState, TestRunner, run_tests};
#[cfg(feature = "test-mode")]
pub use runner::{run_and_exit, test_run};
pub use theme::{ColorMode, Theme};

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "test-mode")]
    pub use linkme::{self, distributed_slice};

    #[cfg(feature = "test-mode")]
    pub use crate::registry::TESTS;
}
