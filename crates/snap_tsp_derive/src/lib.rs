//! Derive macros shared by the snap-tsp crates.
//!
//! The generated code refers to `crate::Error` and `crate::Result`, so the
//! deriving crate must expose both with an `Error::invalid_input` constructor.

mod cli_options;
mod cli_value;
mod kv_display;
mod utils;

use proc_macro::TokenStream;

/// Implements `parse` / `Display` / `variants` for a unit-only enum used as a
/// command line value.
#[proc_macro_derive(CliValue, attributes(cli_value, cli))]
pub fn derive_cli_value(item: TokenStream) -> TokenStream {
    cli_value::derive_cli_value_inner(item)
}

/// Implements `split_arg`, `apply_cli_option` and `cli_usage` for an options
/// struct. Fields without `#[cli(long = "...")]` are left to the caller.
#[proc_macro_derive(CliOptions, attributes(cli))]
pub fn derive_cli_options(item: TokenStream) -> TokenStream {
    cli_options::derive_cli_options_inner(item)
}

#[proc_macro_derive(KvDisplay, attributes(kv))]
pub fn derive_kv_display(item: TokenStream) -> TokenStream {
    kv_display::derive_kv_display_inner(item)
}
