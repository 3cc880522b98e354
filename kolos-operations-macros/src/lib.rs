//! Procedural macros for defining Kolos operations
//!
//! `#[operation]` implements `kolos_operations::Operation` for a command
//! struct so the verb/noun pair that names a mutation event lives next to
//! the struct that performs it.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, DeriveInput, Ident, Lit, Token,
};

/// Attribute macro for defining an operation
///
/// # Usage
///
/// ```ignore
/// #[operation(verb = "link", noun = "task", description = "Link tasks together")]
/// #[derive(Debug, Deserialize, Serialize)]
/// pub struct LinkTasks {
///     pub id: TaskId,
///     pub others: Vec<TaskId>,
/// }
/// ```
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as OperationArgs);
    let input = parse_macro_input!(item as DeriveInput);

    if !matches!(input.data, syn::Data::Struct(_)) {
        return syn::Error::new_spanned(&input.ident, "operation macro only supports structs")
            .to_compile_error()
            .into();
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let verb = &args.verb;
    let noun = &args.noun;
    let description = &args.description;

    let expanded = quote! {
        #input

        impl #impl_generics kolos_operations::Operation for #name #ty_generics #where_clause {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }
        }
    };

    TokenStream::from(expanded)
}

/// Arguments for the #[operation(...)] attribute
struct OperationArgs {
    verb: String,
    noun: String,
    description: String,
}

impl Parse for OperationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut verb = None;
        let mut noun = None;
        let mut description = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: Lit = input.parse()?;

            let value_str = match value {
                Lit::Str(s) => s.value(),
                _ => return Err(syn::Error::new_spanned(value, "expected string literal")),
            };

            match ident.to_string().as_str() {
                "verb" | "noun" if !is_token(&value_str) => {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "verb and noun must be lowercase words separated by '-'",
                    ))
                }
                "verb" => verb = Some(value_str),
                "noun" => noun = Some(value_str),
                "description" => description = Some(value_str),
                other => {
                    return Err(syn::Error::new_spanned(
                        ident,
                        format!("unknown attribute: {}", other),
                    ))
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(OperationArgs {
            verb: verb.ok_or_else(|| input.error("missing 'verb' attribute"))?,
            noun: noun.ok_or_else(|| input.error("missing 'noun' attribute"))?,
            description: description
                .ok_or_else(|| input.error("missing 'description' attribute"))?,
        })
    }
}

/// Verbs and nouns end up in event names, so keep them to `[a-z-]+`
fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '-')
}
