use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

#[proc_macro_derive(Encode)]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let encode_body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let field_encodes = fields.named.iter().map(|f| {
                    let field_name = &f.ident;
                    quote! {
                        mc_protocol::Encode::encode(&self.#field_name, writer)?;
                    }
                });
                quote! {
                    #(#field_encodes)*
                    Ok(())
                }
            }
            Fields::Unnamed(fields) => {
                let field_encodes = (0..fields.unnamed.len()).map(|i| {
                    let index = syn::Index::from(i);
                    quote! {
                        mc_protocol::Encode::encode(&self.#index, writer)?;
                    }
                });
                quote! {
                    #(#field_encodes)*
                    Ok(())
                }
            }
            Fields::Unit => {
                quote! { Ok(()) }
            }
        },
        Data::Enum(_) => {
            quote! {
                compile_error!("Encode derive does not support enums yet")
            }
        }
        Data::Union(_) => {
            quote! {
                compile_error!("Encode derive does not support unions")
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics mc_protocol::Encode for #name #ty_generics #where_clause {
            fn encode<W: std::io::Write>(&self, writer: &mut W) -> mc_protocol::Result<()> {
                #encode_body
            }
        }
    };

    TokenStream::from(expanded)
}

#[proc_macro_derive(Decode)]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let decode_body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let field_decodes = fields.named.iter().map(|f| {
                    let field_name = &f.ident;
                    let field_ty = &f.ty;
                    quote! {
                        #field_name: <#field_ty as mc_protocol::Decode>::decode(reader)?,
                    }
                });
                quote! {
                    Ok(Self {
                        #(#field_decodes)*
                    })
                }
            }
            Fields::Unnamed(fields) => {
                let field_decodes = fields.unnamed.iter().map(|f| {
                    let field_ty = &f.ty;
                    quote! {
                        <#field_ty as mc_protocol::Decode>::decode(reader)?,
                    }
                });
                quote! {
                    Ok(Self(#(#field_decodes)*))
                }
            }
            Fields::Unit => {
                quote! { Ok(Self) }
            }
        },
        Data::Enum(_) => {
            quote! {
                compile_error!("Decode derive does not support enums yet")
            }
        }
        Data::Union(_) => {
            quote! {
                compile_error!("Decode derive does not support unions")
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics mc_protocol::Decode for #name #ty_generics #where_clause {
            fn decode<R: std::io::Read>(reader: &mut R) -> mc_protocol::Result<Self> {
                #decode_body
            }
        }
    };

    TokenStream::from(expanded)
}

/// Attribute recognized on a field: `#[nbt(rename = "...")]` looks the field
/// up under a different compound key than its Rust name.
fn nbt_key_for_field(field: &syn::Field) -> String {
    for attr in &field.attrs {
        if !attr.path().is_ident("nbt") {
            continue;
        }
        let mut renamed = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value = meta.value()?;
                let lit: syn::LitStr = value.parse()?;
                renamed = Some(lit.value());
            }
            Ok(())
        });
        if let Some(renamed) = renamed {
            return renamed;
        }
    }
    field
        .ident
        .as_ref()
        .expect("NbtEncode/NbtDecode only support named fields")
        .to_string()
}

/// Reflective compound binding: matches each field by name (case-insensitive,
/// or `#[nbt(rename = "...")]` override), leaves fields whose key is absent
/// from the compound at `Default::default()`, and ignores unknown compound
/// keys. Grounded in the same loose, best-effort binding the rest of this
/// workspace uses for save-file style data (see `mc-protocol::nbt`).
#[proc_macro_derive(NbtEncode, attributes(nbt))]
pub fn derive_nbt_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return TokenStream::from(quote! {
            compile_error!("NbtEncode derive only supports structs")
        });
    };
    let Fields::Named(fields) = &data.fields else {
        return TokenStream::from(quote! {
            compile_error!("NbtEncode derive requires named fields")
        });
    };

    let field_inserts = fields.named.iter().map(|f| {
        let field_name = &f.ident;
        let key = nbt_key_for_field(f);
        quote! {
            compound.insert(#key, mc_protocol::nbt::NbtValue::from(self.#field_name.clone()));
        }
    });

    let expanded = quote! {
        impl #impl_generics mc_protocol::nbt::NbtEncode for #name #ty_generics #where_clause {
            fn nbt_encode(&self, compound: &mut mc_protocol::nbt::NbtCompound) {
                #(#field_inserts)*
            }
        }
    };

    TokenStream::from(expanded)
}

#[proc_macro_derive(NbtDecode, attributes(nbt))]
pub fn derive_nbt_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return TokenStream::from(quote! {
            compile_error!("NbtDecode derive only supports structs")
        });
    };
    let Fields::Named(fields) = &data.fields else {
        return TokenStream::from(quote! {
            compile_error!("NbtDecode derive requires named fields")
        });
    };

    let field_binds = fields.named.iter().map(|f| {
        let field_name = &f.ident;
        let field_ty = &f.ty;
        let key = nbt_key_for_field(f);
        quote! {
            #field_name: compound
                .get(#key)
                .and_then(|value| <#field_ty as std::convert::TryFrom<&mc_protocol::nbt::NbtValue>>::try_from(value).ok())
                .unwrap_or_default(),
        }
    });

    let expanded = quote! {
        impl #impl_generics mc_protocol::nbt::NbtDecode for #name #ty_generics #where_clause {
            fn nbt_decode(compound: &mc_protocol::nbt::NbtCompound) -> mc_protocol::Result<Self> {
                Ok(Self {
                    #(#field_binds)*
                })
            }
        }
    };

    TokenStream::from(expanded)
}
