// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Assertion engine.
//!
//! Every `check*!` macro follows the same shape: it writes the location and
//! the literal source text of what is checked, evaluates each operand exactly
//! once, then writes the outcome and moves exactly one counter of the
//! [`Context`].
//!
//! ```rust,ignore
//! use harkness::{Context, check, check_int, def_test};
//!
//! #[def_test]
//! fn arithmetic(ctx: &mut Context) {
//!     check!(ctx, 1 + 1 == 2);
//!     check_int!(ctx, 6 * 7, ==, 42);
//! }
//! ```

use core::{cmp::Ordering, fmt, ptr::NonNull};

use crate::{
    context::Context,
    theme::{Role, paint},
};

/// Source location of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.file, self.line)
    }
}

/// What an assertion announces before its outcome.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'s> {
    /// A single expression or comparison.
    Expr(&'s str),
    /// Two expressions compared for equality.
    Pair { lhs: &'s str, rhs: &'s str },
    /// A pointer-like expression and its address.
    Pointer {
        text: &'s str,
        address: usize,
        expect_null: bool,
    },
}

/// Values that can be checked for null.
pub trait Nullable {
    /// The address held, `0` when null.
    fn address(&self) -> usize;
}

impl<T: ?Sized> Nullable for *const T {
    fn address(&self) -> usize {
        self.cast::<()>() as usize
    }
}

impl<T: ?Sized> Nullable for *mut T {
    fn address(&self) -> usize {
        self.cast::<()>() as usize
    }
}

impl<T: ?Sized> Nullable for Option<&T> {
    fn address(&self) -> usize {
        self.map_or(0, |r| (r as *const T).address())
    }
}

impl<T: ?Sized> Nullable for Option<&mut T> {
    fn address(&self) -> usize {
        self.as_deref().map_or(0, |r| (r as *const T).address())
    }
}

impl<T: ?Sized> Nullable for Option<NonNull<T>> {
    fn address(&self) -> usize {
        self.map_or(0, |p| p.as_ptr().address())
    }
}

impl<T: ?Sized> Nullable for Option<Box<T>> {
    fn address(&self) -> usize {
        self.as_deref().map_or(0, |r| (r as *const T).address())
    }
}

/// An integer operand of [`check_int!`](crate::check_int), widened without
/// loss so that mixed signedness compares by value.
#[derive(Debug, Clone, Copy)]
pub enum Int {
    Signed(i128),
    Unsigned(u128),
}

impl Ord for Int {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Int::Signed(a), Int::Signed(b)) => a.cmp(&b),
            (Int::Unsigned(a), Int::Unsigned(b)) => a.cmp(&b),
            (Int::Signed(a), Int::Unsigned(b)) => match u128::try_from(a) {
                Ok(a) => a.cmp(&b),
                Err(_) => Ordering::Less,
            },
            (Int::Unsigned(_), Int::Signed(_)) => other.cmp(self).reverse(),
        }
    }
}

impl PartialOrd for Int {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Int {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Int {}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Int::Signed(v) => fmt::Display::fmt(v, f),
            Int::Unsigned(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// Primitive integers accepted by [`check_int!`](crate::check_int).
pub trait IntOperand {
    fn widen(self) -> Int;
}

macro_rules! int_operand {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl IntOperand for $ty {
                fn widen(self) -> Int {
                    Int::$variant(self.into())
                }
            }
        )*
    };
}

int_operand!(Signed: i8, i16, i32, i64, i128);
int_operand!(Unsigned: u8, u16, u32, u64, u128);

impl IntOperand for isize {
    fn widen(self) -> Int {
        Int::Signed(self as i128)
    }
}

impl IntOperand for usize {
    fn widen(self) -> Int {
        Int::Unsigned(self as u128)
    }
}

impl<T: IntOperand + Copy> IntOperand for &T {
    fn widen(self) -> Int {
        (*self).widen()
    }
}

/// Write the location prefix and the subject of an assertion.
pub fn begin(ctx: &mut Context<'_>, at: Location, subject: Subject<'_>) {
    let theme = ctx.theme();
    let report = ctx.report();
    report.write(format_args!("{at}\t "));
    match subject {
        Subject::Expr(text) => {
            report.write(format_args!("{} ... ", paint(theme, Role::Literal, text)))
        }
        Subject::Pair { lhs, rhs } => report.write(format_args!(
            "{} == {} ... ",
            paint(theme, Role::Literal, lhs),
            paint(theme, Role::Literal, rhs)
        )),
        Subject::Pointer {
            text,
            address,
            expect_null,
        } => {
            let address = format!("{address:#x}");
            report.write(format_args!(
                "{} ({}) is {} ... ",
                paint(theme, Role::Literal, text),
                paint(theme, Role::Value, &address),
                if expect_null { "null" } else { "non-null" }
            ))
        }
    }
}

/// Conclude a boolean assertion.
pub fn conclude(ctx: &mut Context<'_>, ok: bool) {
    if ok {
        ctx.record_pass();
    } else {
        ctx.record_fail(None);
    }
}

/// Conclude a comparison, showing the evaluated left-hand side on failure.
pub fn conclude_compare(
    ctx: &mut Context<'_>,
    ok: bool,
    lhs_text: &str,
    lhs_value: fmt::Arguments<'_>,
) {
    if ok {
        ctx.record_pass();
    } else {
        let theme = ctx.theme();
        ctx.record_fail(Some(format_args!(
            "{} = {}.",
            paint(theme, Role::Literal, lhs_text),
            paint(theme, Role::Value, &lhs_value)
        )));
    }
}

/// Conclude a string equality check, comparing bytes.
pub fn conclude_str_eq(ctx: &mut Context<'_>, lhs: &str, rhs: &str) {
    if lhs.as_bytes() == rhs.as_bytes() {
        ctx.record_pass();
    } else {
        let theme = ctx.theme();
        ctx.record_fail(Some(format_args!(
            "{} != {}",
            paint(theme, Role::Str, lhs),
            paint(theme, Role::Str, rhs)
        )));
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __here {
    () => {
        $crate::assert::Location::new(::core::file!(), ::core::line!())
    };
}

/// Check that a boolean expression holds.
///
/// ```rust,ignore
/// check!(ctx, v.is_empty());
/// ```
#[macro_export]
macro_rules! check {
    ($ctx:expr, $cond:expr $(,)?) => {{
        let __ok: bool = $cond;
        let __ctx: &mut $crate::Context<'_> = &mut *$ctx;
        $crate::assert::begin(
            __ctx,
            $crate::__here!(),
            $crate::assert::Subject::Expr(::core::stringify!($cond)),
        );
        $crate::assert::conclude(__ctx, __ok);
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_compare {
    ($ctx:expr, $fmt:literal, $lhs:expr, $op:tt, $rhs:expr, |$v:ident| $conv:expr) => {{
        let __lhs = {
            let $v = $lhs;
            $conv
        };
        let __rhs = {
            let $v = $rhs;
            $conv
        };
        let __ctx: &mut $crate::Context<'_> = &mut *$ctx;
        $crate::assert::begin(
            __ctx,
            $crate::__here!(),
            $crate::assert::Subject::Expr(::core::concat!(
                ::core::stringify!($lhs),
                " ",
                ::core::stringify!($op),
                " ",
                ::core::stringify!($rhs)
            )),
        );
        let __ok: bool = __lhs $op __rhs;
        $crate::assert::conclude_compare(
            __ctx,
            __ok,
            ::core::stringify!($lhs),
            ::core::format_args!($fmt, __lhs),
        );
    }};
}

/// Compare two integers with a binary operator. Both sides are widened
/// without loss and printed in decimal on failure.
///
/// ```rust,ignore
/// check_int!(ctx, foo(6, 10), ==, 6);
/// ```
///
/// Only primitive integers are accepted:
///
/// ```compile_fail
/// use harkness::{Context, check_int};
///
/// fn body(ctx: &mut Context<'_>) {
///     check_int!(ctx, 3.7, ==, 3);
/// }
/// ```
#[macro_export]
macro_rules! check_int {
    ($ctx:expr, $lhs:expr, $op:tt, $rhs:expr $(,)?) => {
        $crate::__check_compare!($ctx, "{}", $lhs, $op, $rhs, |v| {
            $crate::assert::IntOperand::widen(v)
        })
    };
}

/// Compare two characters with a binary operator.
#[macro_export]
macro_rules! check_char {
    ($ctx:expr, $lhs:expr, $op:tt, $rhs:expr $(,)?) => {
        $crate::__check_compare!($ctx, "{}", $lhs, $op, $rhs, |v| v as char)
    };
}

/// Compare two floats with a binary operator. Both sides are converted to
/// `f64` and printed with six decimals on failure.
#[macro_export]
macro_rules! check_float {
    ($ctx:expr, $lhs:expr, $op:tt, $rhs:expr $(,)?) => {
        $crate::__check_compare!($ctx, "{:.6}", $lhs, $op, $rhs, |v| v as f64)
    };
}

/// Compare two values of any comparable type, printing the left-hand side
/// with `Debug` on failure.
#[macro_export]
macro_rules! check_cmp {
    ($ctx:expr, $lhs:expr, $op:tt, $rhs:expr $(,)?) => {
        $crate::__check_compare!($ctx, "{:?}", $lhs, $op, $rhs, |v| v)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_pointer {
    ($ctx:expr, $ptr:expr, $expect_null:expr) => {{
        let __address = {
            let __ptr = $ptr;
            $crate::assert::Nullable::address(&__ptr)
        };
        let __ctx: &mut $crate::Context<'_> = &mut *$ctx;
        $crate::assert::begin(
            __ctx,
            $crate::__here!(),
            $crate::assert::Subject::Pointer {
                text: ::core::stringify!($ptr),
                address: __address,
                expect_null: $expect_null,
            },
        );
        $crate::assert::conclude(__ctx, (__address == 0) == $expect_null);
    }};
}

/// Check that a pointer-like value is not null.
///
/// The address is printed whatever the outcome.
#[macro_export]
macro_rules! check_non_null {
    ($ctx:expr, $ptr:expr $(,)?) => {
        $crate::__check_pointer!($ctx, $ptr, false)
    };
}

/// Check that a pointer-like value is null.
#[macro_export]
macro_rules! check_null {
    ($ctx:expr, $ptr:expr $(,)?) => {
        $crate::__check_pointer!($ctx, $ptr, true)
    };
}

/// Check that two strings have the same contents.
///
/// ```rust,ignore
/// check_str_eq!(ctx, greeting, "hello");
/// ```
#[macro_export]
macro_rules! check_str_eq {
    ($ctx:expr, $lhs:expr, $rhs:expr $(,)?) => {{
        let __lhs = $lhs;
        let __rhs = $rhs;
        let __ctx: &mut $crate::Context<'_> = &mut *$ctx;
        $crate::assert::begin(
            __ctx,
            $crate::__here!(),
            $crate::assert::Subject::Pair {
                lhs: ::core::stringify!($lhs),
                rhs: ::core::stringify!($rhs),
            },
        );
        $crate::assert::conclude_str_eq(
            __ctx,
            ::core::convert::AsRef::<str>::as_ref(&__lhs),
            ::core::convert::AsRef::<str>::as_ref(&__rhs),
        );
    }};
}
