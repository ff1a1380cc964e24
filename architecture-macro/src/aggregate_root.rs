use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub fn impl_aggregate_root(ast: DeriveInput) -> TokenStream {
    let name = ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    quote! {
        impl #impl_generics ::hub_architecture::model::AggregateRoot for #name #ty_generics #where_clause { }
    }
}
