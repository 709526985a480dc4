//! Derive macros for todolists feature actions
//!
//! `#[derive(Action)]` gives every feature action enum a `name()` method
//! returning the variant name. The stores use it as the `action` field when
//! they log an action the runtime refused.
//!
//! # Example
//!
//! ```ignore
//! use todolists_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum ListAction {
//!     Create { title: String },
//!     Created { list: TodoList },
//!     CreateFailed { error: ApiError },
//! }
//!
//! assert_eq!(ListAction::Create { title: "A".into() }.name(), "Create");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, parse_macro_input};

/// Derive macro for feature action enums
///
/// Generates `name()`, which returns the variant name.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if applied
/// to a non-enum type.
#[proc_macro_derive(Action)]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let name_arms = data_enum.variants.iter().map(|variant| {
        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let variant_name = variant.ident.to_string();
        quote! { #pattern => #variant_name, }
    });

    let expanded = quote! {
        impl #name {
            /// Variant name of this action
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Pattern matching any value of a variant, whatever its field shape
fn variant_pattern(variant: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}
