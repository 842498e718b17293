// Copyright 2019 The Druid Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// Adapted for use in kyute.
use crate::CRATE;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{spanned::Spanned, Error, ExprPath, LitStr, Member};

const BASE_DATA_ATTR_PATH: &str = "data";
const IGNORE_ATTR_PATH: &str = "ignore";
const DATA_SAME_FN_ATTR_PATH: &str = "same_fn";

/// A field taking part in the comparison.
struct DataField {
    member: Member,
    same_fn: Option<ExprPath>,
}

impl DataField {
    /// Returns `None` for `#[data(ignore)]` fields.
    fn parse(index: usize, field: &syn::Field) -> syn::Result<Option<DataField>> {
        let mut ignore = false;
        let mut same_fn = None;

        for attr in field.attrs.iter() {
            if !attr.path().is_ident(BASE_DATA_ATTR_PATH) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(IGNORE_ATTR_PATH) {
                    if ignore {
                        return Err(meta.error("Duplicate attribute"));
                    }
                    ignore = true;
                    Ok(())
                } else if meta.path.is_ident(DATA_SAME_FN_ATTR_PATH) {
                    if same_fn.is_some() {
                        return Err(meta.error("Duplicate attribute"));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    same_fn = Some(lit.parse::<ExprPath>()?);
                    Ok(())
                } else {
                    Err(meta.error("Unknown attribute"))
                }
            })?;
        }

        if ignore {
            return Ok(None);
        }
        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(index.into()),
        };
        Ok(Some(DataField { member, same_fn }))
    }

    fn same_fn(&self) -> TokenStream {
        match &self.same_fn {
            Some(path) => quote!(#path),
            None => quote_spanned!(Span::call_site()=> ::#CRATE::Data::same),
        }
    }

    /// Name of the variable bound to this field in enum match arms (`__self_name`, `__other_0`).
    fn binding(&self, side: &str) -> syn::Ident {
        match &self.member {
            Member::Named(ident) => format_ident!("__{}_{}", side, ident.to_string().trim_start_matches("r#")),
            Member::Unnamed(index) => format_ident!("__{}_{}", side, index.index),
        }
    }
}

fn parse_fields(fields: &syn::Fields) -> syn::Result<Vec<DataField>> {
    let mut parsed = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if let Some(field) = DataField::parse(i, field)? {
            parsed.push(field);
        }
    }
    Ok(parsed)
}

/// `same(a0, b0) && same(a1, b1) && ...`, or `true` when nothing is compared.
fn conjunction(fields: &[DataField], operands: impl Fn(&DataField) -> (TokenStream, TokenStream)) -> TokenStream {
    if fields.is_empty() {
        return quote!(true);
    }
    let tests = fields.iter().map(|field| {
        let same_fn = field.same_fn();
        let (left, right) = operands(field);
        quote!( #same_fn(#left, #right) )
    });
    quote!( #( #tests )&&* )
}

pub(crate) fn derive_data_impl(input: syn::DeriveInput) -> Result<TokenStream, Error> {
    let body = match &input.data {
        syn::Data::Struct(s) => {
            let fields = parse_fields(&s.fields)?;
            conjunction(&fields, |f| {
                let member = &f.member;
                (quote!(&self.#member), quote!(&other.#member))
            })
        }
        syn::Data::Enum(e) => enum_body(&input.ident, e)?,
        syn::Data::Union(u) => {
            return Err(Error::new(
                u.union_token.span(),
                "Data implementations cannot be derived from unions",
            ))
        }
    };

    let ident = &input.ident;
    let impl_generics = generics_bounds(&input.generics);
    let (_, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl<#impl_generics> ::#CRATE::Data for #ident #ty_generics #where_clause {
            #[allow(unreachable_patterns)]
            fn same(&self, other: &Self) -> bool {
                #body
            }
        }
    })
}

fn enum_body(ident: &syn::Ident, e: &syn::DataEnum) -> syn::Result<TokenStream> {
    if e.variants.iter().all(|v| v.fields.is_empty()) {
        return Ok(quote!(::std::mem::discriminant(self) == ::std::mem::discriminant(other)));
    }

    let mut arms = Vec::new();
    for variant in e.variants.iter() {
        let name = &variant.ident;
        let fields = parse_fields(&variant.fields)?;
        let members: Vec<_> = fields.iter().map(|f| &f.member).collect();
        let lefts: Vec<_> = fields.iter().map(|f| f.binding("self")).collect();
        let rights: Vec<_> = fields.iter().map(|f| f.binding("other")).collect();
        let test = conjunction(&fields, |f| {
            let (l, r) = (f.binding("self"), f.binding("other"));
            (quote!(#l), quote!(#r))
        });
        // brace patterns work for unit, tuple and struct variants alike
        arms.push(quote! {
            (#ident::#name { #( #members: #lefts, )* .. }, #ident::#name { #( #members: #rights, )* .. }) => #test,
        });
    }

    Ok(quote! {
        match (self, other) {
            #( #arms )*
            _ => false,
        }
    })
}

fn generics_bounds(generics: &syn::Generics) -> TokenStream {
    let res = generics.params.iter().map(|gp| match gp {
        syn::GenericParam::Type(ty) => {
            let ident = &ty.ident;
            let bounds = &ty.bounds;
            if bounds.is_empty() {
                quote_spanned!(ty.span()=> #ident : ::#CRATE::Data)
            } else {
                quote_spanned!(ty.span()=> #ident : #bounds + ::#CRATE::Data)
            }
        }
        syn::GenericParam::Lifetime(lf) => quote!(#lf),
        syn::GenericParam::Const(cst) => quote!(#cst),
    });

    quote!( #( #res, )* )
}
