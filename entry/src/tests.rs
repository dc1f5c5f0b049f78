// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Demo tests. Some of them fail on purpose to show the failure output.

use harkness::{
    Context, check, check_cmp, check_int, check_non_null, check_null, check_str_eq, def_test,
};

use crate::math::foo;

#[def_test]
fn early_test(ctx: &mut Context) {
    check!(ctx, true);
}

#[def_test]
fn passing_test(ctx: &mut Context) {
    check!(ctx, 1 + 1 == 2);
}

#[def_test]
fn failing_test(ctx: &mut Context) {
    check!(ctx, 1 + 1 == 3);
}

#[def_test]
fn test_assert_int(ctx: &mut Context) {
    check_int!(ctx, foo(6, 10), ==, 6);
    check_int!(ctx, foo(6, 10), ==, 7);
}

#[def_test]
fn test_assert(ctx: &mut Context) {
    check!(ctx, 1 == 1);
    check!(ctx, 1 == 2);
}

#[def_test]
fn test_non_null(ctx: &mut Context) {
    let value = 12;
    let t1: *const i32 = &value;
    let t2: *const i32 = core::ptr::null();

    check_non_null!(ctx, t1);
    check_non_null!(ctx, t2);
    check_null!(ctx, t2);
}

#[def_test]
fn test_str_eq(ctx: &mut Context) {
    let str1 = "hello";
    let str2 = String::from("world");

    check_str_eq!(ctx, str1, "hello");
    check_str_eq!(ctx, str1, str2);
}

#[def_test("versions compare")]
fn versions(ctx: &mut Context) {
    check_cmp!(ctx, (1, 2, 0), <, (1, 10, 0));
    check_cmp!(ctx, "beta", >, "alpha");
}
