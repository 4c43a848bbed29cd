extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Error, Fields, FieldsNamed, ext::IdentExt, parse_macro_input};

// Only structs with named fields map onto JSON objects
fn named_fields(input: &DeriveInput, derive: &str) -> Result<FieldsNamed, Error> {
    let schema = if let Data::Struct(data) = &input.data {
        data
    } else {
        return Err(Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        ));
    };

    if let Fields::Named(fields) = &schema.fields {
        Ok(fields.clone())
    } else {
        Err(Error::new_spanned(
            input,
            format!("{derive} can only be derived for named field structs"),
        ))
    }
}

#[proc_macro_derive(FromJson)]
pub fn derive_from_json(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_from_json(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_from_json(input: &DeriveInput) -> Result<TokenStream2, Error> {
    let fields = named_fields(input, "FromJson")?;
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let idents: Vec<_> = fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
    let types: Vec<_> = fields.named.iter().map(|f| &f.ty).collect();
    // `r#type` is written as `"type"` in JSON
    let keys: Vec<_> = idents.iter().map(|i| i.unraw().to_string()).collect();
    let slots: Vec<_> = idents.iter().map(|i| format_ident!("__{}", i.unraw())).collect();

    let expanded = quote! {
        impl #impl_generics ::json_codec::FromJson for #struct_name #ty_generics #where_clause {
            fn from_json(
                value: &::json_codec::JsonValue,
            ) -> ::core::result::Result<Self, ::json_codec::ConversionError> {
                let members = value.as_object().ok_or_else(|| {
                    ::json_codec::ConversionError::type_mismatch("object", value)
                })?;

                #( let mut #slots: ::core::option::Option<#types> = ::core::option::Option::None; )*

                for (key, member) in members {
                    match key.as_str() {
                        #(
                            #keys => {
                                #slots = ::core::option::Option::Some(
                                    <#types as ::json_codec::FromJson>::from_json(member)
                                        .map_err(|e| e.in_field(#keys))?,
                                );
                            }
                        )*
                        _ => {
                            return ::core::result::Result::Err(
                                ::json_codec::ConversionError::UnknownField(key.clone()),
                            );
                        }
                    }
                }

                ::core::result::Result::Ok(#struct_name {
                    #(
                        #idents: match #slots {
                            ::core::option::Option::Some(v) => v,
                            ::core::option::Option::None => {
                                <#types as ::json_codec::FromJson>::from_missing().ok_or(
                                    ::json_codec::ConversionError::MissingField(#keys),
                                )?
                            }
                        },
                    )*
                })
            }
        }
    };

    Ok(expanded)
}

#[proc_macro_derive(ToJson)]
pub fn derive_to_json(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_to_json(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_to_json(input: &DeriveInput) -> Result<TokenStream2, Error> {
    let fields = named_fields(input, "ToJson")?;
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let inserts = fields.named.iter().filter_map(|f| f.ident.as_ref()).map(|ident| {
        let key = ident.unraw().to_string();
        quote! {
            members.insert(
                ::std::string::String::from(#key),
                ::json_codec::ToJson::to_json(&self.#ident),
            );
        }
    });

    // Members are written in declaration order
    let expanded = quote! {
        impl #impl_generics ::json_codec::ToJson for #struct_name #ty_generics #where_clause {
            fn to_json(&self) -> ::json_codec::JsonValue {
                let mut members = ::json_codec::Map::new();
                #( #inserts )*
                ::json_codec::JsonValue::Object(members)
            }
        }
    };

    Ok(expanded)
}
