mod ui_config;

use proc_macro::TokenStream;

/// Derive `rusty_ui::UiConfig` from a `#[ui(asset = "...", layer = N)]` attribute.
#[proc_macro_derive(UiConfig, attributes(ui))]
pub fn derive_ui_config(item: TokenStream) -> TokenStream {
    ui_config::derive_ui_config(item)
}
