// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test collection.
//!
//! Every function marked with `#[def_test]` contributes one [`TestDescriptor`]
//! to the [`TESTS`] distributed slice. The slice is assembled by the linker,
//! so no test file ever edits a shared list.

use crate::context::Context;

/// Signature every test body must have.
pub type TestFn = fn(&mut Context<'_>);

/// A registered test case.
#[derive(Clone, Copy)]
pub struct TestDescriptor {
    name: &'static str,
    module: &'static str,
    file: &'static str,
    line: u32,
    callback: TestFn,
    placeholder: bool,
}

impl TestDescriptor {
    /// Describe a test declared at `file:line` inside `module`.
    pub const fn new(
        name: &'static str,
        module: &'static str,
        file: &'static str,
        line: u32,
        callback: TestFn,
    ) -> Self {
        Self {
            name,
            module,
            file,
            line,
            callback,
            placeholder: false,
        }
    }

    #[cfg_attr(not(feature = "test-mode"), allow(dead_code))]
    const fn placeholder() -> Self {
        Self {
            name: "",
            module: module_path!(),
            file: file!(),
            line: line!(),
            callback: skip,
            placeholder: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Whether this is the non-test entry that keeps the slice populated.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Run the test body against `ctx`.
    pub fn invoke(&self, ctx: &mut Context<'_>) {
        (self.callback)(ctx)
    }
}

#[cfg_attr(not(feature = "test-mode"), allow(dead_code))]
fn skip(_: &mut Context<'_>) {}

impl core::fmt::Debug for TestDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TestDescriptor")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("file", &self.file)
            .field("line", &self.line)
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

/// Sort descriptors into declaration order: by file, then by line.
pub fn sort_by_declaration(tests: &mut [&TestDescriptor]) {
    tests.sort_by(|a, b| (a.file, a.line).cmp(&(b.file, b.line)));
}

#[cfg(feature = "test-mode")]
mod collected {
    use linkme::distributed_slice;

    use super::{TestDescriptor, sort_by_declaration};

    /// All descriptors contributed by `#[def_test]`, in link order.
    #[distributed_slice]
    pub static TESTS: [TestDescriptor];

    // Guarantees the slice is never empty, even in a program without tests.
    #[distributed_slice(TESTS)]
    static PLACEHOLDER: TestDescriptor = TestDescriptor::placeholder();

    /// Every entry of [`TESTS`], placeholder included, in declaration order.
    pub fn tests() -> Vec<&'static TestDescriptor> {
        // Keeps the placeholder's object file in the link.
        core::hint::black_box(&PLACEHOLDER);
        let mut tests: Vec<&'static TestDescriptor> = TESTS.iter().collect();
        sort_by_declaration(&mut tests);
        tests
    }

    /// Declared tests only, in declaration order.
    pub fn declared() -> impl Iterator<Item = &'static TestDescriptor> {
        tests().into_iter().filter(|t| !t.is_placeholder())
    }
}

#[cfg(feature = "test-mode")]
pub use collected::{TESTS, declared, tests};

#[cfg(feature = "test-mode")]
#[doc(hidden)]
#[macro_export]
macro_rules! __register_test {
    ($item:item) => {
        #[$crate::__private::distributed_slice($crate::__private::TESTS)]
        #[linkme(crate = $crate::__private::linkme)]
        $item
    };
}

#[cfg(not(feature = "test-mode"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __register_test {
    ($item:item) => {};
}

#[cfg(feature = "test-mode")]
#[doc(hidden)]
#[macro_export]
macro_rules! __if_test_mode {
    ($($item:item)*) => {
        $($item)*
    };
}

#[cfg(not(feature = "test-mode"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __if_test_mode {
    ($($item:item)*) => {};
}

#[cfg(all(test, feature = "test-mode"))]
mod tests {
    use super::*;

    fn body(_: &mut Context<'_>) {}

    #[test]
    fn placeholder_is_always_present() {
        let placeholders = tests().into_iter().filter(|t| t.is_placeholder()).count();
        assert_eq!(placeholders, 1);
        assert!(declared().all(|t| !t.is_placeholder()));
    }

    #[test]
    fn sort_follows_file_then_line() {
        let a = TestDescriptor::new("a", "m", "src/b.rs", 3, body);
        let b = TestDescriptor::new("b", "m", "src/a.rs", 40, body);
        let c = TestDescriptor::new("c", "m", "src/b.rs", 1, body);
        let mut list = [&a, &b, &c];
        sort_by_declaration(&mut list);
        let names: Vec<_> = list.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn sort_keeps_duplicate_sites_stable() {
        let first = TestDescriptor::new("dup", "m", "src/x.rs", 7, body);
        let second = TestDescriptor::new("dup", "m", "src/x.rs", 7, body);
        let mut list = [&first, &second];
        sort_by_declaration(&mut list);
        assert!(core::ptr::eq(list[0], &first));
        assert!(core::ptr::eq(list[1], &second));
    }
}
