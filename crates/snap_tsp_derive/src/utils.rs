use quote::quote;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Path, Type};

/// Joins the `///` lines of an item into one sentence-ish string.
pub fn doc_summary(attrs: &[Attribute]) -> String {
    let mut parts = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) = &nv.value
        {
            let line = s.value();
            let line = line.trim();
            if !line.is_empty() {
                parts.push(line.to_owned());
            }
        }
    }
    parts.join(" ")
}

pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    match parse_with {
        Some(parse_with) => quote! { #parse_with(&raw)? },
        None => quote! {
            raw.parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        },
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (idx, ch) in s.chars().enumerate() {
        if ch == '_' {
            out.push('-');
        } else if ch.is_ascii_uppercase() {
            if idx != 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{doc_summary, to_kebab_case};

    #[test]
    fn to_kebab_case_handles_pascal_and_snake_names() {
        assert_eq!(to_kebab_case("SolverMode"), "solver-mode");
        assert_eq!(to_kebab_case("max_nodes"), "max-nodes");
        assert_eq!(to_kebab_case("GeoJson"), "geo-json");
        assert_eq!(to_kebab_case("X"), "x");
    }

    #[test]
    fn doc_summary_joins_trimmed_doc_lines() {
        let item: syn::ItemStruct = parse_quote! {
            /// Path to the network file.
            ///
            /// Header row is skipped.
            struct S;
        };
        assert_eq!(
            doc_summary(&item.attrs),
            "Path to the network file. Header row is skipped."
        );
    }

    #[test]
    fn doc_summary_is_empty_without_docs() {
        let item: syn::ItemStruct = parse_quote! {
            #[derive(Debug)]
            struct S;
        };
        assert!(doc_summary(&item.attrs).is_empty());
    }
}
