use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::record::Record;

pub fn read(record: &Record) -> TokenStream {
    let name = &record.ident;
    let reads = record.fields.iter().map(|(field, ty)| {
        quote_spanned! { field.span() =>
            let #field = <#ty as personbench_serialization::Read>::read(bytes, pos)?;
        }
    });
    let names = record.fields.iter().map(|(field, _)| field);
    quote! {
        #[automatically_derived]
        impl personbench_serialization::Read for #name {
            #[inline]
            fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, personbench_serialization::ReadError> {
                #(#reads)*
                Ok(Self { #(#names),* })
            }
        }
    }
}

pub fn write(record: &Record) -> TokenStream {
    let name = &record.ident;
    let writes = record.fields.iter().map(|(field, _)| {
        quote_spanned! { field.span() =>
            personbench_serialization::Write::write(&self.#field, bytes, pos)?;
        }
    });
    quote! {
        #[automatically_derived]
        impl personbench_serialization::Write for #name {
            #[inline]
            fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), personbench_serialization::WriteError> {
                #(#writes)*
                Ok(())
            }
        }
    }
}

pub fn num_bytes(record: &Record) -> TokenStream {
    let name = &record.ident;
    let sizes = record.fields.iter().map(|(field, _)| {
        quote_spanned! { field.span() =>
            + personbench_serialization::NumBytes::num_bytes(&self.#field)
        }
    });
    quote! {
        #[automatically_derived]
        impl personbench_serialization::NumBytes for #name {
            #[inline]
            fn num_bytes(&self) -> usize {
                0 #(#sizes)*
            }
        }
    }
}
