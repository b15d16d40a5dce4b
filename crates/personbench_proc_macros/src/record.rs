use syn::{
    Attribute, Data, DeriveInput, Fields, Ident, Lit, Meta, NestedMeta, Type, spanned::Spanned,
};

/// A named-field struct accepted by the codec and entity derives.
pub struct Record {
    pub ident: Ident,
    /// Stored class name, `#[entity(class = "...")]` or the struct ident.
    pub class: String,
    pub fields: Vec<(Ident, Type)>,
}

impl Record {
    pub fn parse(input: DeriveInput, derive: &str) -> syn::Result<Self> {
        let DeriveInput {
            attrs,
            ident,
            generics,
            data,
            ..
        } = input;
        if !generics.params.is_empty() {
            return Err(syn::Error::new(
                generics.span(),
                format!("{} cannot be derived for generic types", derive),
            ));
        }
        let Data::Struct(data) = data else {
            return Err(syn::Error::new(
                ident.span(),
                format!("{} can only be derived for structs", derive),
            ));
        };
        let Fields::Named(named) = data.fields else {
            return Err(syn::Error::new(
                ident.span(),
                format!("{} requires a struct with named fields", derive),
            ));
        };

        let fields = named
            .named
            .into_iter()
            .filter_map(|f| f.ident.map(|name| (name, f.ty)))
            .collect();
        let class = class_override(&attrs)?.unwrap_or_else(|| ident.to_string());
        Ok(Self {
            ident,
            class,
            fields,
        })
    }
}

fn class_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut class = None;
    for attr in attrs.iter().filter(|a| a.path.is_ident("entity")) {
        let Meta::List(list) = attr.parse_meta()? else {
            return Err(syn::Error::new(attr.span(), "expected #[entity(class = \"...\")]"));
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("class") => {
                    let Lit::Str(value) = nv.lit else {
                        return Err(syn::Error::new(nv.lit.span(), "class must be a string literal"));
                    };
                    if value.value().is_empty() {
                        return Err(syn::Error::new(value.span(), "class must not be empty"));
                    }
                    class = Some(value.value());
                }
                other => {
                    return Err(syn::Error::new(other.span(), "unknown entity attribute"));
                }
            }
        }
    }
    Ok(class)
}
