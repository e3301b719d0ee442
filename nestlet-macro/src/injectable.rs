use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{DeriveInput, Expr, Ident, LitStr, Type, parse_macro_input};

#[derive(FromDeriveInput)]
#[darling(attributes(injectable), supports(struct_named, struct_unit))]
struct InjectableInput {
    ident: Ident,
    generics: syn::Generics,
    data: Data<Ignored, InjectField>,
    #[darling(default)]
    lifecycle: Option<LitStr>,
}

#[derive(FromField)]
#[darling(attributes(inject))]
struct InjectField {
    ident: Option<Ident>,
    ty: Type,
    /// String token: `#[inject(token = "DB_URL")]`
    #[darling(default)]
    token: Option<LitStr>,
    /// Any expression convertible into a token: `#[inject(token_expr = tokens::clock())]`
    #[darling(default)]
    token_expr: Option<Expr>,
    /// `Arc<T>` where `T` is not injectable itself, resolved by its type token.
    #[darling(default)]
    value: bool,
    /// Filled with `Default::default()`.
    #[darling(default)]
    skip: bool,
}

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = InjectableInput::from_derive_input(&input)
        .map_err(|e| e.write_errors())
        .and_then(|parsed| generate_injectable_impl(&parsed).map_err(|e| e.to_compile_error()));

    match expanded {
        Ok(tokens) | Err(tokens) => TokenStream::from(tokens),
    }
}

fn generate_injectable_impl(input: &InjectableInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(fields) => &fields.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new(
                struct_name.span(),
                "#[derive(Injectable)] can only be applied to structs",
            ));
        }
    };

    let mut metadata = Vec::new();
    let mut initializers = Vec::new();
    let mut index = 0usize;

    for field in fields {
        let Some(field_name) = &field.ident else {
            continue;
        };

        if field.skip {
            initializers.push(quote! {
                #field_name: ::std::default::Default::default()
            });
            continue;
        }

        let inner = arc_inner(&field.ty).ok_or_else(|| {
            syn::Error::new_spanned(
                &field.ty,
                "injected fields must be `Arc<T>`; use #[inject(skip)] for anything else",
            )
        })?;

        metadata.push(match (&field.token, &field.token_expr) {
            (Some(_), Some(expr)) => {
                return Err(syn::Error::new_spanned(
                    expr,
                    "`token` and `token_expr` are mutually exclusive",
                ));
            }
            (Some(name), None) => quote! {
                .token(#index, ::nestlet::Token::named(#name))
            },
            (None, Some(expr)) => quote! {
                .token(#index, #expr)
            },
            (None, None) if field.value || matches!(inner, Type::TraitObject(_)) => quote! {
                .typed::<#inner>(#index)
            },
            (None, None) => quote! {
                .class::<#inner>(#index)
            },
        });

        // Trait objects are stored as `Arc<dyn Trait>` inside the erased instance.
        initializers.push(match inner {
            Type::TraitObject(_) => quote! {
                #field_name: ::std::sync::Arc::clone(
                    &*args.get::<::std::sync::Arc<#inner>>(#index)?
                )
            },
            _ => quote! {
                #field_name: args.get::<#inner>(#index)?
            },
        });
        index += 1;
    }

    let lifecycle = match &input.lifecycle {
        Some(lit) => {
            let variant = match lit.value().as_str() {
                "singleton" => Ident::new("Singleton", Span::call_site()),
                "transient" => Ident::new("Transient", Span::call_site()),
                other => {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("unknown lifecycle `{}`, expected `singleton` or `transient`", other),
                    ));
                }
            };
            quote! {
                fn lifecycle() -> ::std::option::Option<::nestlet::Lifecycle> {
                    ::std::option::Option::Some(::nestlet::Lifecycle::#variant)
                }
            }
        }
        None => quote! {},
    };

    let args_name = if index == 0 {
        quote!(_args)
    } else {
        quote!(args)
    };

    Ok(quote! {
        impl #impl_generics ::nestlet::Injectable for #struct_name #ty_generics #where_clause {
            fn dependencies() -> ::nestlet::DependencyMetadata {
                ::nestlet::DependencyMetadata::new()
                    #(#metadata)*
            }

            #lifecycle

            fn construct(#args_name: &::nestlet::Arguments) -> ::nestlet::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#initializers),*
                })
            }
        }
    })
}

/// Inner type of `Arc<T>`, `Arc<dyn Trait>` or `std::sync::Arc<..>`.
fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => match args.args.first()? {
            syn::GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}
