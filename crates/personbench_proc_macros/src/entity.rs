use proc_macro2::TokenStream;
use quote::quote;

use crate::record::Record;

/// Binds the struct to its stored class. The codec impls are required by
/// the `Entity` supertraits and come from the sibling derives.
pub fn expand(record: &Record) -> TokenStream {
    let name = &record.ident;
    let class = &record.class;
    quote! {
        #[automatically_derived]
        impl personbench_objectdb::Entity for #name {
            #[inline]
            fn class_name() -> &'static str {
                #class
            }
        }
    }
}
