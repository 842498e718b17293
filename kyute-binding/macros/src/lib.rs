//! Derive macros for `kyute-binding`.
extern crate proc_macro;
use proc_macro2::Span;
use quote::{ToTokens, TokenStreamExt};

mod data;
mod lens;

//--------------------------------------------------------------------------------------------------
struct CrateName;
const CRATE: CrateName = CrateName;

impl ToTokens for CrateName {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        tokens.append(syn::Ident::new("kyute_binding", Span::call_site()))
    }
}

//--------------------------------------------------------------------------------------------------

/// Derives `kyute_binding::Data`, comparing fields one by one with `Data::same`.
///
/// Field attributes:
/// - `#[data(ignore)]`: the field doesn't take part in the comparison.
/// - `#[data(same_fn = "path")]`: compare the field with `path(&a, &b)` instead.
#[proc_macro_derive(Data, attributes(data))]
pub fn derive_data(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    data::derive_data_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Derives one `kyute_binding::Lens` per field, exposed as an associated constant named after
/// the field (`elem_0`, `elem_1`, ... for tuple structs).
///
/// Field attributes:
/// - `#[lens(ignore)]`: no lens for this field.
/// - `#[lens(name = "other")]`: name of the associated constant.
///
/// # Examples
///
///```ignore
/// #[derive(Clone, Lens)]
/// struct State { content: String }
///
/// let content = State::content;
///```
#[proc_macro_derive(Lens, attributes(lens))]
pub fn derive_lens(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    lens::derive_lens_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
