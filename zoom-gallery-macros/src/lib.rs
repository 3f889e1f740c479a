use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Index};

/// Derive `Animatable` for a struct by interpolating every field.
///
/// Every field type must itself implement `Animatable`.
///
/// # Example
/// ```ignore
/// #[derive(Clone, PartialEq, Animatable)]
/// struct Pose {
///     scale: f32,
///     translate: Vector2,
/// }
/// ```
#[proc_macro_derive(Animatable)]
pub fn derive_animatable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "Animatable can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let body = match &data.fields {
        Fields::Named(fields) => {
            let lerps = fields.named.iter().map(|field| {
                let ident = &field.ident;
                let ty = &field.ty;
                quote! {
                    #ident: <#ty as ::zoom_gallery::animation::Animatable>::lerp(
                        &from.#ident,
                        &to.#ident,
                        t,
                    )
                }
            });
            quote! { Self { #(#lerps,)* } }
        }
        Fields::Unnamed(fields) => {
            let lerps = fields.unnamed.iter().enumerate().map(|(i, field)| {
                let index = Index::from(i);
                let ty = &field.ty;
                quote! {
                    <#ty as ::zoom_gallery::animation::Animatable>::lerp(
                        &from.#index,
                        &to.#index,
                        t,
                    )
                }
            });
            quote! { Self(#(#lerps,)*) }
        }
        Fields::Unit => quote! {
            {
                let _ = (from, to, t);
                Self
            }
        },
    };

    let expanded = quote! {
        impl #impl_generics ::zoom_gallery::animation::Animatable for #name #ty_generics #where_clause {
            fn lerp(from: &Self, to: &Self, t: f32) -> Self {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}
