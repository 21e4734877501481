//! `#[base_entity]` injects the columns every persisted club_hub record carries
//! (`id`, `created_at`, `updated_at`) and wires the DAO helper traits for them.
//!
//! It must be placed above `#[sea_orm::model]` so the injected fields are seen by
//! the sea-orm derive.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Expr, ExprLit, Field, Fields, Ident, ItemStruct, Lit, Meta, Path, Token, parse_macro_input,
    parse_quote, punctuated::Punctuated,
};

struct EntityOptions {
    traits: Path,
    active_model: Ident,
    id: Ident,
    created_at: Ident,
    updated_at: Ident,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            traits: parse_quote!(crate::db::dao::base_traits),
            active_model: Ident::new("ActiveModel", Span::call_site()),
            id: Ident::new("id", Span::call_site()),
            created_at: Ident::new("created_at", Span::call_site()),
            updated_at: Ident::new("updated_at", Span::call_site()),
        }
    }
}

#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut input = parse_macro_input!(item as ItemStruct);
    let Fields::Named(fields) = &mut input.fields else {
        return syn::Error::new_spanned(&input, "base_entity requires a struct with named fields")
            .to_compile_error()
            .into();
    };

    let declared: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
        .collect();

    let id = &options.id;
    let created_at = &options.created_at;
    let updated_at = &options.updated_at;

    let mut injected: Vec<Field> = Vec::new();
    if !declared.contains(&id.to_string()) {
        injected.push(parse_quote! {
            #[sea_orm(primary_key, auto_increment = false)]
            pub #id: uuid::Uuid
        });
    }
    if !declared.contains(&created_at.to_string()) {
        injected.push(parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub #created_at: sea_orm::entity::prelude::DateTimeWithTimeZone
        });
    }
    if !declared.contains(&updated_at.to_string()) {
        injected.push(parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub #updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone
        });
    }

    // Injected columns lead so the primary key is always the first column.
    let mut named: Punctuated<Field, Token![,]> = injected.into_iter().collect();
    named.extend(fields.named.iter().cloned());
    fields.named = named;

    let traits = &options.traits;
    let active_model = &options.active_model;

    let expanded = quote! {
        #input

        impl #traits::HasIdActiveModel for #active_model {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.#id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits::TimestampedActiveModel for #active_model {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl #traits::HasCreatedAtColumn for Entity {
            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }

        impl #traits::Identified for Model {
            fn persisted_id(&self) -> Option<uuid::Uuid> {
                Some(self.#id)
            }
        }

        impl #traits::Identified for #active_model {
            fn persisted_id(&self) -> Option<uuid::Uuid> {
                // Only a value read back from the database counts as persisted.
                match &self.#id {
                    sea_orm::ActiveValue::Unchanged(id) => Some(*id),
                    _ => None,
                }
            }
        }
    };

    expanded.into()
}

fn parse_options(args: Punctuated<Meta, Token![,]>) -> Result<EntityOptions, syn::Error> {
    let mut options = EntityOptions::default();

    for meta in args {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value pair, e.g. traits = \"path::to::traits\"",
            ));
        };

        let Some(key) = pair.path.get_ident().cloned() else {
            return Err(syn::Error::new_spanned(
                pair.path,
                "expected simple identifier for attribute key",
            ));
        };

        let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = pair.value
        else {
            return Err(syn::Error::new_spanned(
                pair.value,
                "expected string literal for attribute value",
            ));
        };

        match key.to_string().as_str() {
            "traits" => {
                options.traits = value.parse::<Path>().map_err(|err| {
                    syn::Error::new(value.span(), format!("invalid traits path: {err}"))
                })?;
            }
            "active_model" => options.active_model = Ident::new(&value.value(), value.span()),
            "id" => options.id = Ident::new(&value.value(), value.span()),
            "created_at" => options.created_at = Ident::new(&value.value(), value.span()),
            "updated_at" => options.updated_at = Ident::new(&value.value(), value.span()),
            _ => {
                return Err(syn::Error::new_spanned(
                    key,
                    "unknown base_entity attribute key",
                ));
            }
        }
    }

    Ok(options)
}
