use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Expr, ItemStruct, Path, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

struct ModuleItem {
    attrs: Vec<Attribute>,
    path: Path,
}

impl Parse for ModuleItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let path = input.parse()?;
        Ok(ModuleItem { attrs, path })
    }
}

/// An exported token: a type (`UserService`, `dyn Repository`) or a string.
enum ExportItem {
    Type(Tagged<Type>),
    Named(Tagged<syn::LitStr>),
}

struct Tagged<T> {
    attrs: Vec<Attribute>,
    value: T,
}

impl Parse for ExportItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        if input.peek(syn::LitStr) {
            Ok(ExportItem::Named(Tagged {
                attrs,
                value: input.parse()?,
            }))
        } else {
            Ok(ExportItem::Type(Tagged {
                attrs,
                value: input.parse()?,
            }))
        }
    }
}

struct ExprItem {
    attrs: Vec<Attribute>,
    expr: Expr,
}

impl Parse for ExprItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let expr = input.parse()?;
        Ok(ExprItem { attrs, expr })
    }
}

/// Represents a trait binding: (dyn Trait => Impl)
struct BindingItem {
    trait_type: Type,
    impl_type: Path,
}

impl Parse for BindingItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let content;
        syn::parenthesized!(content in input);

        let trait_type: Type = content.parse()?;
        content.parse::<Token![=>]>()?;
        let impl_type: Path = content.parse()?;

        Ok(BindingItem {
            trait_type,
            impl_type,
        })
    }
}

#[derive(Default)]
struct ModuleArgs {
    imports: Vec<ModuleItem>,
    controllers: Vec<ModuleItem>,
    providers: Vec<ModuleItem>,
    bindings: Vec<BindingItem>,
    exports: Vec<ExportItem>,
    extensions: Vec<ExprItem>,
    middlewares: Vec<ExprItem>,
}

impl Parse for ModuleArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ModuleArgs::default();

        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            // Parse array: [Item1, Item2, ...]
            let content;
            syn::bracketed!(content in input);

            match name.to_string().as_str() {
                "imports" => {
                    args.imports = content
                        .parse_terminated(ModuleItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                "controllers" => {
                    args.controllers = content
                        .parse_terminated(ModuleItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                "providers" => {
                    args.providers = content
                        .parse_terminated(ModuleItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                "bindings" => {
                    args.bindings = content
                        .parse_terminated(BindingItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                "exports" => {
                    args.exports = content
                        .parse_terminated(ExportItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                "extensions" => {
                    args.extensions = content
                        .parse_terminated(ExprItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                "middlewares" => {
                    args.middlewares = content
                        .parse_terminated(ExprItem::parse, Token![,])?
                        .into_iter()
                        .collect();
                }
                other => {
                    return Err(syn::Error::new(
                        name.span(),
                        format!(
                            "unknown module key `{}`, expected one of: imports, providers, \
                             bindings, controllers, exports, extensions, middlewares",
                            other
                        ),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

pub fn module_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ModuleArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_module_impl(&args, &input);

    TokenStream::from(expanded)
}

fn generate_module_impl(args: &ModuleArgs, input: &ItemStruct) -> TokenStream2 {
    let module_name = &input.ident;

    let imports = args.imports.iter().map(|item| {
        let path = &item.path;
        let attrs = &item.attrs;
        quote! {
            #(#attrs)*
            let descriptor = descriptor.import::<#path>();
        }
    });

    let providers = args.providers.iter().map(|item| {
        let path = &item.path;
        let attrs = &item.attrs;
        quote! {
            #(#attrs)*
            let descriptor = descriptor.provider::<#path>();
        }
    });

    // The implementation is registered under its own token too, and the
    // trait token resolves it so both share one singleton.
    let bindings = args.bindings.iter().map(|binding| {
        let trait_type = &binding.trait_type;
        let impl_type = &binding.impl_type;
        quote! {
            let descriptor = descriptor
                .provider::<#impl_type>()
                .factory(
                    ::nestlet::Token::of_type::<#trait_type>(),
                    |container: &::nestlet::Container| -> ::nestlet::Result<::std::sync::Arc<#trait_type>> {
                        let instance = container.resolve::<#impl_type>()?;
                        ::std::result::Result::Ok(instance as ::std::sync::Arc<#trait_type>)
                    },
                );
        }
    });

    let controllers = args.controllers.iter().map(|item| {
        let path = &item.path;
        let attrs = &item.attrs;
        quote! {
            #(#attrs)*
            let descriptor = descriptor.controller::<#path>();
        }
    });

    let exports = args.exports.iter().map(|item| match item {
        ExportItem::Type(Tagged { attrs, value }) => quote! {
            #(#attrs)*
            let descriptor = descriptor.export_type::<#value>();
        },
        ExportItem::Named(Tagged { attrs, value }) => quote! {
            #(#attrs)*
            let descriptor = descriptor.export(#value);
        },
    });

    let extensions = args.extensions.iter().map(|item| {
        let expr = &item.expr;
        let attrs = &item.attrs;
        quote! {
            #(#attrs)*
            let descriptor = descriptor.extension(#expr);
        }
    });

    let middlewares = args.middlewares.iter().map(|item| {
        let expr = &item.expr;
        let attrs = &item.attrs;
        quote! {
            #(#attrs)*
            let descriptor = descriptor.middleware(#expr);
        }
    });

    quote! {
        #input

        impl ::nestlet::Module for #module_name {
            fn descriptor() -> ::nestlet::ModuleDescriptor {
                let descriptor = ::nestlet::ModuleDescriptor::new();
                #(#imports)*
                #(#bindings)*
                #(#providers)*
                #(#controllers)*
                #(#exports)*
                #(#extensions)*
                #(#middlewares)*
                descriptor
            }
        }

        impl #module_name {
            /// Create a fresh application context with this module registered
            pub fn create_context() -> ::nestlet::Result<::nestlet::ApplicationContext> {
                let mut context = ::nestlet::ApplicationContext::new();
                context.register_module(&::nestlet::ModuleDef::of::<Self>())?;
                ::std::result::Result::Ok(context)
            }
        }
    }
}
