use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod aggregate_root;

/// Marks a struct as an aggregate root so repositories may store it.
#[proc_macro_derive(AggregateRoot)]
pub fn derive_aggregate_root(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    aggregate_root::impl_aggregate_root(ast).into()
}
