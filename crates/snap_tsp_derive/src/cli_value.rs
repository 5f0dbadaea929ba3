use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

struct Variant {
    ident: syn::Ident,
    canonical: String,
    aliases: Vec<String>,
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = input.ident.clone();

    let Data::Enum(data_enum) = input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut option_name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in &input.attrs {
        if !attr.path().is_ident("cli_value") {
            continue;
        }
        if let Err(err) = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                option_name = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
        }) {
            return err.to_compile_error().into();
        }
    }

    let mut variants = Vec::new();
    for variant in data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.span(), "CliValue needs unit variants only")
                .to_compile_error()
                .into();
        }

        let mut parsed = Variant {
            canonical: utils::to_kebab_case(&variant.ident.to_string()),
            ident: variant.ident,
            aliases: Vec::new(),
        };
        for attr in &variant.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            if let Err(err) = attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    parsed.canonical = lit.value();
                } else if meta.path.is_ident("alias") {
                    parsed.aliases.push(lit.value());
                } else {
                    return Err(meta.error("unsupported cli attribute; expected name/alias"));
                }
                Ok(())
            }) {
                return err.to_compile_error().into();
            }
        }
        variants.push(parsed);
    }

    let parse_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let accepted = std::iter::once(&v.canonical)
            .chain(v.aliases.iter())
            .map(|s| LitStr::new(s, Span::call_site()));
        quote! { #(#accepted)|* => Ok(Self::#ident), }
    });
    let display_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let canonical = LitStr::new(&v.canonical, Span::call_site());
        quote! { Self::#ident => #canonical, }
    });

    let expected = variants
        .iter()
        .map(|v| v.canonical.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let expected_lit = LitStr::new(&expected, Span::call_site());
    let option_lit = LitStr::new(&option_name, Span::call_site());

    let expanded = quote! {
        impl #enum_ident {
            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        #expected_lit
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    #(#display_arms)*
                })
            }
        }
    };

    TokenStream::from(expanded)
}
