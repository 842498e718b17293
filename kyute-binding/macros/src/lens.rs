//! Mostly stolen from druid-derive
use crate::CRATE;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{spanned::Spanned, LitStr};

const BASE_LENS_ATTR_PATH: &str = "lens";
const IGNORE_ATTR_PATH: &str = "ignore";
const LENS_NAME_ATTR_PATH: &str = "name";

pub(crate) fn derive_lens_impl(input: syn::DeriveInput) -> syn::Result<TokenStream> {
    match &input.data {
        syn::Data::Struct(s) => derive_struct(&input, s),
        syn::Data::Enum(e) => Err(syn::Error::new(
            e.enum_token.span(),
            "Lens implementations cannot be derived from enums",
        )),
        syn::Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "Lens implementations cannot be derived from unions",
        )),
    }
}

#[derive(Default)]
struct LensAttrs {
    ignore: bool,
    name: Option<syn::Ident>,
}

impl LensAttrs {
    fn parse(field: &syn::Field) -> syn::Result<LensAttrs> {
        let mut attrs = LensAttrs::default();
        for attr in field.attrs.iter() {
            if !attr.path().is_ident(BASE_LENS_ATTR_PATH) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(IGNORE_ATTR_PATH) {
                    if attrs.ignore {
                        return Err(meta.error("Duplicate attribute"));
                    }
                    attrs.ignore = true;
                    Ok(())
                } else if meta.path.is_ident(LENS_NAME_ATTR_PATH) {
                    if attrs.name.is_some() {
                        return Err(meta.error("Duplicate attribute"));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.name = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("Unknown attribute"))
                }
            })?;
        }
        Ok(attrs)
    }
}

fn derive_struct(input: &syn::DeriveInput, s: &syn::DataStruct) -> syn::Result<TokenStream> {
    let ty = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Lens implementations cannot be derived for generic structs",
        ));
    }

    let fields = match &s.fields {
        syn::Fields::Named(fields_named) => &fields_named.named,
        syn::Fields::Unnamed(fields_unnamed) => &fields_unnamed.unnamed,
        syn::Fields::Unit => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Lens implementations cannot be derived from unit structs",
            ))
        }
    };

    let mut decls = Vec::new();
    let mut impls = Vec::new();
    let mut associated_items = Vec::new();

    for (i, f) in fields.iter().enumerate() {
        let attrs = LensAttrs::parse(f)?;
        if attrs.ignore {
            continue;
        }

        let default_name = f
            .ident
            .clone()
            .unwrap_or_else(|| syn::Ident::new(&format!("elem_{}", i), Span::call_site()));
        let name = attrs.name.unwrap_or(default_name);
        let lens_ty_name = syn::Ident::new(
            &format!("{}Lens_{}", ty, name.to_string().trim_start_matches("r#")),
            Span::call_site(),
        );
        let vis = &f.vis;
        let lty = &f.ty;
        let access = match &f.ident {
            Some(ident) => {
                quote! { #ident }
            }
            None => {
                let index = syn::Index::from(i);
                quote! { #index }
            }
        };

        let decl = quote! {
            #[allow(non_camel_case_types)]
            #[derive(Copy, Clone, Debug, Default)]
            #vis struct #lens_ty_name;
        };
        decls.push(decl);

        let lens_impl = quote! {
            impl ::#CRATE::Lens<#ty, #lty> for #lens_ty_name {
                fn get<'a>(&self, data: &'a #ty) -> &'a #lty {
                    &data.#access
                }

                fn get_mut<'a>(&self, data: &'a mut #ty) -> &'a mut #lty {
                    &mut data.#access
                }
            }
        };
        impls.push(lens_impl);

        let assoc_item = quote! {
            #vis const #name : #lens_ty_name = #lens_ty_name;
        };
        associated_items.push(assoc_item);
    }

    let expanded = quote! {
        #(#decls)*
        #(#impls)*

        #[allow(non_upper_case_globals)]
        impl #ty {
            #(#associated_items)*
        }
    };

    Ok(expanded)
}
