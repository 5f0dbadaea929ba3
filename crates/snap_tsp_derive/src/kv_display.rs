use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "KvDisplay requires named fields")
            .to_compile_error()
            .into();
    };

    let mut keys = Vec::new();
    let mut vals = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let mut key = field_ident.to_string();
        let mut fmt_mode = String::from("display");
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("kv") {
                continue;
            }
            if let Err(err) = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    return Ok(());
                }
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    key = lit.value();
                } else if meta.path.is_ident("fmt") {
                    fmt_mode = lit.value();
                } else {
                    return Err(meta.error("unsupported kv attribute; expected name/fmt/skip"));
                }
                Ok(())
            }) {
                return err.to_compile_error().into();
            }
        }

        if skip {
            continue;
        }

        vals.push(match fmt_mode.as_str() {
            "display" => quote! { &self.#field_ident },
            "len" => quote! { &self.#field_ident.len() },
            "path" => quote! { &self.#field_ident.display() },
            "secs" => quote! { &format_args!("{:.3}s", self.#field_ident.as_secs_f64()) },
            "debug" => quote! { &format_args!("{:?}", self.#field_ident) },
            other => {
                return syn::Error::new(field.span(), format!("unsupported kv fmt mode: {other}"))
                    .to_compile_error()
                    .into();
            }
        });
        keys.push(key);
    }

    let width = keys.iter().map(String::len).max().unwrap_or(0);
    let template = keys
        .iter()
        .map(|key| format!("\n\t{key:<width$} = {{}}"))
        .collect::<String>();
    let format_lit = LitStr::new(&template, Span::call_site());

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #format_lit, #(#vals),*)
            }
        }
    };

    TokenStream::from(expanded)
}
