use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DataStruct, DeriveInput, Fields, Index, parse_macro_input, parse_quote};

/// Derives `binarch::Serializable` for a struct.
///
/// Fields are walked in declaration order, each through its own
/// `Serializable` impl.
#[proc_macro_derive(Serializable)]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(DataStruct { fields, .. }) => fields,
        _ => {
            return syn::Error::new_spanned(
                &input.ident,
                "Serializable can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let members: Vec<TokenStream2> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let ident = &field.ident;
                quote! { #ident }
            })
            .collect(),
        Fields::Unnamed(unnamed) => (0..unnamed.unnamed.len())
            .map(|i| {
                let index = Index::from(i);
                quote! { #index }
            })
            .collect(),
        Fields::Unit => Vec::new(),
    };

    // Bound field types rather than type parameters, so `Vec<T>` picks up the
    // `T: Default` it needs.
    let mut generics = input.generics.clone();
    if generics.type_params().next().is_some() {
        let where_clause = generics.make_where_clause();
        for field in fields.iter() {
            let ty = &field.ty;
            where_clause
                .predicates
                .push(parse_quote! { #ty: ::binarch::Serializable });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let archive = if members.is_empty() {
        format_ident!("_archive")
    } else {
        format_ident!("archive")
    };

    let expanded = quote! {
        impl #impl_generics ::binarch::Serializable for #struct_name #ty_generics #where_clause {
            fn serialize<__A: ::binarch::Archive>(
                &mut self,
                #archive: &mut __A,
            ) -> ::binarch::Result<()> {
                #( ::binarch::Serializable::serialize(&mut self.#members, #archive)?; )*
                ::core::result::Result::Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}
