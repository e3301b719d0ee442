use proc_macro::TokenStream;

mod injectable;
mod module;

/// Derive macro implementing `nestlet::Injectable` from the struct's fields
///
/// Every field must be an `Arc`:
/// - `Arc<T>` depends on `T`, which must itself be injectable.
/// - `Arc<dyn Trait>` depends on the `dyn Trait` type token, usually bound
///   with `bindings = [(dyn Trait => Impl)]` in a module.
/// - `#[inject(token = "NAME")]` depends on a string token instead.
/// - `#[inject(token_expr = expr)]` depends on any token expression.
/// - `#[inject(value)]` depends on `T`'s type token without requiring
///   `T: Injectable` (values and factories).
/// - `#[inject(skip)]` fills the field with `Default::default()`.
///
/// `#[injectable(lifecycle = "transient")]` on the struct sets the default
/// lifecycle.
///
/// # Example
/// ```ignore
/// use nestlet::Injectable;
/// use std::sync::Arc;
///
/// #[derive(Injectable)]
/// #[injectable(lifecycle = "transient")]
/// pub struct UserService {
///     repository: Arc<dyn UserRepository>,
///     #[inject(token = "DATABASE_URL")]
///     url: Arc<String>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

/// Attribute macro for defining a module
///
/// Accepted keys, each a bracketed list: `imports`, `providers`,
/// `bindings` (`(dyn Trait => Impl)` pairs), `controllers`, `exports`
/// (types or string tokens), `extensions` and `middlewares` (expressions).
///
/// # Example
/// ```ignore
/// use nestlet::module;
///
/// #[module(
///     imports = [DatabaseModule],
///     providers = [UserService],
///     bindings = [(dyn UserRepository => PgUserRepository)],
///     controllers = [UserController],
///     exports = [UserService, dyn UserRepository],
///     middlewares = [LoggingMiddleware],
/// )]
/// pub struct UserModule;
/// ```
#[proc_macro_attribute]
pub fn module(attr: TokenStream, item: TokenStream) -> TokenStream {
    module::module_attribute(attr, item)
}
