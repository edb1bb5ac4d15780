use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`Record` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`Record` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let mut names = HashSet::new();

    for field in &fields {
        if !names.insert(field.wire_name.value()) {
            Err(Error::new(
                field.wire_name.span(),
                "Field names must be unique.",
            ))?
        }
    }

    // Every field is visited in declaration order, in all three methods.
    let descriptors = fields.iter().map(|field| {
        let FieldMetadata { ty, wire_name, .. } = field;

        quote! {
            {
                let (kind, repeat) = <#ty as ::packform::avec::FromValues>::layout();
                ::packform::sans::shape::FieldDescriptor::new(#wire_name, kind).repeat(repeat)
            }
        }
    });

    let constructors = fields.iter().map(|field| {
        let FieldMetadata { name, ty, .. } = field;

        quote! {
            #name: <#ty as ::packform::avec::FromValues>::from_values(values)?
        }
    });

    let flatteners = fields.iter().map(|field| {
        let FieldMetadata { name, ty, .. } = field;

        quote! {
            <#ty as ::packform::avec::FromValues>::to_values(&self.#name, out);
        }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::packform::avec::Record for #name #ty_generics #where_clause {
            fn shape() -> ::packform::sans::shape::Shape {
                ::packform::sans::shape::Shape::new()
                    #(.with(#descriptors))*
            }
        }

        impl #impl_generics ::packform::avec::FromValues for #name #ty_generics #where_clause {
            fn layout() -> (::packform::sans::shape::FieldKind, usize) {
                let shape = <Self as ::packform::avec::Record>::shape();
                (::packform::sans::shape::FieldKind::Nested(shape), 1)
            }

            #[allow(unused_variables)]
            fn from_values(
                values: &mut ::packform::sans::rebuild::Values,
            ) -> ::core::result::Result<Self, ::packform::sans::rebuild::RebuildError> {
                ::core::result::Result::Ok(Self {
                    #(#constructors,)*
                })
            }

            #[allow(unused_variables)]
            fn to_values(
                &self,
                out: &mut ::packform::__private::Vec<::packform::sans::kind::Primitive>,
            ) {
                #(#flatteners)*
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    wire_name: LitStr,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let wire_name = match field.attrs.iter().find(|a| a.path().is_ident("record")) {
            Some(attr) => {
                let RecordAttribute { rename } = attr.meta.require_list()?.parse_args()?;
                rename
            }
            None => {
                // Raw identifiers keep their prefix in `to_string`.
                let ident = name.to_string();
                let ident = ident.strip_prefix("r#").unwrap_or(&ident);
                LitStr::new(ident, name.span())
            }
        };

        Ok(Self {
            name,
            ty: field.ty.clone(),
            wire_name,
        })
    }
}

#[derive(Debug)]
struct RecordAttribute {
    rename: LitStr,
}

impl Parse for RecordAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let key = input.parse::<Ident>()?;

        if key != "rename" {
            Err(Error::new_spanned(
                key,
                "Expected `rename = \"...\"`.",
            ))?
        }

        input.parse::<Token![=]>()?;
        let rename = input.parse::<LitStr>()?;

        Ok(Self { rename })
    }
}
