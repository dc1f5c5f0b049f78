// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Procedural macros for declaring harkness tests.
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{
    Error, FnArg, Ident, ItemFn, ItemMod, LitStr, Result, ReturnType,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Marks a module as test-only code.
///
/// The module is compiled only when the `test-mode` feature of `harkness`
/// is enabled.
///
/// # Example
///
/// ```rust,ignore
/// use harkness::{Context, check, def_test, mod_test};
///
/// #[mod_test]
/// mod tests {
///     use super::*;
///
///     #[def_test]
///     fn addition(ctx: &mut Context) {
///         check!(ctx, 2 + 2 == 4);
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn mod_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return Error::new(Span::call_site(), "expect an empty attribute: `#[mod_test]`")
            .to_compile_error()
            .into();
    }
    let module = parse_macro_input!(item as ItemMod);

    quote! {
        ::harkness::__if_test_mode! {
            #module
        }
    }
    .into()
}

/// Name given to a test: either the function name or an explicit one.
enum TestName {
    FromFn,
    Ident(Ident),
    Str(LitStr),
}

impl Parse for TestName {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(TestName::FromFn);
        }
        let name = if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            if lit.value().is_empty() {
                return Err(Error::new(lit.span(), "test name must not be empty"));
            }
            TestName::Str(lit)
        } else {
            TestName::Ident(input.call(Ident::parse_any)?)
        };
        if !input.is_empty() {
            return Err(input.error("expect a single test name"));
        }
        Ok(name)
    }
}

/// Marks a function as a test.
///
/// The function takes the run context and returns nothing. It is registered
/// under its own name, or under the name given as argument.
///
/// # Example
///
/// ```rust,ignore
/// use harkness::{Context, check_int, def_test};
///
/// #[def_test]
/// fn addition(ctx: &mut Context) {
///     check_int!(ctx, 2 + 2, ==, 4);
/// }
///
/// // Selected with `HARKNESS_TEST=foo`.
/// #[def_test(foo)]
/// fn foo_large_input(ctx: &mut Context) {
///     check_int!(ctx, foo(6, 10), ==, 6);
/// }
/// ```
///
/// Several functions may share a name; selecting it runs all of them.
#[proc_macro_attribute]
pub fn def_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let name = parse_macro_input!(attr as TestName);
    let input = parse_macro_input!(item as ItemFn);
    match generate_function_test(name, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate test code for a single function
fn generate_function_test(name: TestName, input: ItemFn) -> Result<proc_macro2::TokenStream> {
    let sig = &input.sig;
    let fn_name = &sig.ident;

    // Test functions must coerce to `harkness::TestFn`.
    if let ReturnType::Type(..) = sig.output {
        return Err(Error::new_spanned(
            &sig.output,
            "expect no return value for the test function",
        ));
    }
    if sig.asyncness.is_some() {
        return Err(Error::new_spanned(sig.asyncness, "test functions cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &sig.generics,
            "test functions cannot be generic",
        ));
    }
    if sig.inputs.len() != 1 || matches!(sig.inputs.first(), Some(FnArg::Receiver(_))) {
        return Err(Error::new_spanned(
            &sig.inputs,
            "expect exactly one argument: `ctx: &mut harkness::Context`",
        ));
    }

    let name_str = match name {
        TestName::FromFn => fn_name.unraw().to_string(),
        TestName::Ident(ident) => ident.unraw().to_string(),
        TestName::Str(lit) => lit.value(),
    };

    // A unique identifier for the descriptor of this function.
    let descriptor_name = format_ident!(
        "__HARKNESS_TEST_{}",
        fn_name.unraw().to_string().to_uppercase()
    );

    Ok(quote! {
        #[allow(dead_code)]
        #input

        ::harkness::__register_test! {
            #[allow(non_upper_case_globals)]
            static #descriptor_name: ::harkness::TestDescriptor = ::harkness::TestDescriptor::new(
                #name_str,
                ::core::module_path!(),
                ::core::file!(),
                ::core::line!(),
                #fn_name,
            );
        }
    })
}
