extern crate proc_macro;

use proc_macro::TokenStream;

/// Captures a member access on a fake as a call specification.
///
/// See `decoy::call!` for the supported syntax.
#[proc_macro]
pub fn call(input: TokenStream) -> TokenStream {
    let expr = syn::parse_macro_input!(input as syn::Expr);
    decoy_macros_impl::call_impl(expr).into()
}
