// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Small functions the demo tests exercise.

/// `b` for small `a`, `a` otherwise.
pub fn foo(a: i32, b: i32) -> i32 {
    if a < 5 { b } else { a }
}

/// First byte of `haystack` equal to `needle`.
pub fn find(haystack: &[u8], needle: u8) -> Option<&u8> {
    haystack.iter().find(|&&b| b == needle)
}

pub fn average(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

pub fn initial(word: &str) -> char {
    word.chars().next().unwrap_or(' ')
}

#[harkness::mod_test]
mod tests {
    use harkness::{
        Context, check_char, check_float, check_int, check_non_null, check_null, def_test,
    };

    use super::*;

    #[def_test(foo)]
    fn foo_small_input(ctx: &mut Context) {
        check_int!(ctx, foo(1, 10), ==, 10);
        check_int!(ctx, foo(4, -3), <, 0);
    }

    #[def_test(foo)]
    fn foo_large_input(ctx: &mut Context) {
        check_int!(ctx, foo(5, 10), ==, 5);
        check_int!(ctx, foo(6, 10), >=, 6);
    }

    #[def_test]
    fn find_byte(ctx: &mut Context) {
        let data = b"harkness";
        check_non_null!(ctx, find(data, b'k'));
        check_null!(ctx, find(data, b'z'));
    }

    #[def_test]
    fn average_values(ctx: &mut Context) {
        check_float!(ctx, average(&[1.0, 2.0, 3.0]), ==, 2.0);
        check_float!(ctx, average(&[]), ==, 0.0);
    }

    #[def_test]
    fn initial_char(ctx: &mut Context) {
        check_char!(ctx, initial("harkness"), ==, 'h');
        check_char!(ctx, initial(""), ==, ' ');
    }
}
