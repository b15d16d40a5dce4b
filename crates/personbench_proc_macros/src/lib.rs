use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod codec;
mod entity;
mod record;

use record::Record;

#[proc_macro_derive(Read)]
pub fn derive_read(input: TokenStream) -> TokenStream {
    expand(input, "Read", codec::read)
}

#[proc_macro_derive(Write)]
pub fn derive_write(input: TokenStream) -> TokenStream {
    expand(input, "Write", codec::write)
}

#[proc_macro_derive(NumBytes)]
pub fn derive_num_bytes(input: TokenStream) -> TokenStream {
    expand(input, "NumBytes", codec::num_bytes)
}

/// Implements `personbench_objectdb::Entity`. The class name defaults to
/// the struct name and can be set with `#[entity(class = "...")]`.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    expand(input, "Entity", entity::expand)
}

fn expand(
    input: TokenStream,
    derive: &str,
    generate: fn(&Record) -> proc_macro2::TokenStream,
) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match Record::parse(input, derive) {
        Ok(record) => generate(&record).into(),
        Err(e) => e.to_compile_error().into(),
    }
}
