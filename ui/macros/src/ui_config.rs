use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Expr, LitStr, parse_macro_input};

pub fn derive_ui_config(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let struct_name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut asset: Option<LitStr> = None;
    let mut layer: Option<Expr> = None;

    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("ui")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("asset") {
                asset = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("layer") {
                layer = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported ui attribute, expected `asset` or `layer`"))
            }
        });
        if let Err(err) = parsed {
            return err.to_compile_error().into();
        }
    }

    let Some(asset) = asset else {
        return syn::Error::new_spanned(
            struct_name,
            "UiConfig requires #[ui(asset = \"...\")] naming the asset key",
        )
        .to_compile_error()
        .into();
    };

    // The layer defaults to the bottom z-order group.
    let layer = match layer {
        Some(layer) => quote! { #layer },
        None => quote! { 0 },
    };

    // Use ::rusty_ui which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as rusty_ui;` in lib.rs
    TokenStream::from(quote! {
        impl #impl_generics ::rusty_ui::UiConfig for #struct_name #ty_generics #where_clause {
            const DESCRIPTOR: ::rusty_ui::UiDescriptor =
                ::rusty_ui::UiDescriptor::new(#asset, ::rusty_ui::LayerId::new(#layer));
        }
    })
}
