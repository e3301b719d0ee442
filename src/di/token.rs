use crate::di::Constructor;
use crate::di::Injectable;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a [`Token`] inside a container's provider map.
///
/// Type tokens are keyed by [`TypeId`], so two distinct types that happen to
/// share a name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Type(TypeId),
    Name(Arc<str>),
    Symbol(Uuid),
}

/// Lookup key for a provider: a type, a string, or an opaque [`Symbol`].
///
/// A type token created with [`Token::of`] also carries the type's
/// [`Constructor`], which lets a container build it without an explicit
/// registration when it has no dependencies.
///
/// # Example
/// ```
/// use nestlet::{Symbol, Token};
///
/// let by_name = Token::from("DB_TOKEN");
/// let logger = Symbol::new("LOGGER");
/// let by_symbol = Token::from(&logger);
///
/// assert_ne!(by_name, by_symbol);
/// assert_eq!(by_symbol, Token::from(logger.clone()));
/// ```
#[derive(Clone)]
pub struct Token {
    key: TokenKey,
    label: Arc<str>,
    constructor: Option<Constructor>,
}

impl Token {
    /// Token for a constructible type.
    pub fn of<T: Injectable>() -> Self {
        Self::from(Constructor::of::<T>())
    }

    /// Token for any type, including `dyn Trait`, without a constructor.
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        Self {
            key: TokenKey::Type(TypeId::of::<T>()),
            label: Arc::from(std::any::type_name::<T>()),
            constructor: None,
        }
    }

    /// String token.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        Self {
            key: TokenKey::Name(Arc::clone(&name)),
            label: name,
            constructor: None,
        }
    }

    pub fn key(&self) -> &TokenKey {
        &self.key
    }

    /// Human-readable name used in logs and errors.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn shared_label(&self) -> Arc<str> {
        Arc::clone(&self.label)
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.to_string()).finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            TokenKey::Symbol(_) => write!(f, "Symbol({})", self.label),
            _ => f.write_str(&self.label),
        }
    }
}

impl From<Constructor> for Token {
    fn from(constructor: Constructor) -> Self {
        Self {
            key: TokenKey::Type(constructor.type_id()),
            label: Arc::from(constructor.name()),
            constructor: Some(constructor),
        }
    }
}

impl From<&Token> for Token {
    fn from(token: &Token) -> Self {
        token.clone()
    }
}

impl From<&'static str> for Token {
    fn from(name: &'static str) -> Self {
        Self::named(name)
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<Symbol> for Token {
    fn from(symbol: Symbol) -> Self {
        Self {
            key: TokenKey::Symbol(symbol.id),
            label: symbol.description,
            constructor: None,
        }
    }
}

impl From<&Symbol> for Token {
    fn from(symbol: &Symbol) -> Self {
        Self::from(symbol.clone())
    }
}

/// Opaque token identity. Every call to [`Symbol::new`] yields a new
/// identity, even for equal descriptions.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: Uuid,
    description: Arc<str>,
}

impl Symbol {
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
