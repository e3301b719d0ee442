//! Dependency metadata store.
//!
//! Every constructible type declares its constructor parameters through
//! [`Injectable::dependencies`](crate::Injectable::dependencies). The
//! declaration is index-addressable: recording a parameter merges into the
//! descriptor at that index and never replaces the whole list, so several
//! calls can annotate the same parameter (a concrete type first, an explicit
//! token later).

use crate::di::{Injectable, Token};

/// What is known about one constructor parameter.
#[derive(Debug, Clone, Default)]
pub struct ParamDescriptor {
    concrete: Option<Token>,
    token: Option<Token>,
}

impl ParamDescriptor {
    /// The concrete type recorded for this parameter.
    pub fn concrete(&self) -> Option<&Token> {
        self.concrete.as_ref()
    }

    /// The explicit injection token recorded for this parameter.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// The token used for wiring: an explicit token wins over the concrete type.
    pub fn effective(&self) -> Option<&Token> {
        self.token.as_ref().or(self.concrete.as_ref())
    }
}

/// Ordered, index-addressable constructor parameter list of one type.
///
/// # Example
/// ```
/// use nestlet::{DependencyMetadata, Token};
///
/// struct Database;
///
/// let metadata = DependencyMetadata::new()
///     .typed::<Database>(0)
///     .token(1, "CACHE_TTL");
///
/// assert_eq!(metadata.len(), 2);
/// assert_eq!(metadata.get(1).unwrap().effective(), Some(&Token::from("CACHE_TTL")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyMetadata {
    params: Vec<ParamDescriptor>,
}

impl DependencyMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter `index` is a constructible type.
    pub fn class<T: Injectable>(mut self, index: usize) -> Self {
        self.record_concrete(index, Token::of::<T>());
        self
    }

    /// Parameter `index` is a type the container can only look up, such as a
    /// `dyn Trait` binding or a value registered as an instance.
    pub fn typed<T: ?Sized + 'static>(mut self, index: usize) -> Self {
        self.record_concrete(index, Token::of_type::<T>());
        self
    }

    /// Parameter `index` is injected through an explicit token.
    pub fn token(mut self, index: usize, token: impl Into<Token>) -> Self {
        self.record_token(index, token.into());
        self
    }

    pub fn push_class<T: Injectable>(self) -> Self {
        let index = self.len();
        self.class::<T>(index)
    }

    pub fn push_typed<T: ?Sized + 'static>(self) -> Self {
        let index = self.len();
        self.typed::<T>(index)
    }

    pub fn push_token(self, token: impl Into<Token>) -> Self {
        let index = self.len();
        self.token(index, token)
    }

    pub fn record_concrete(&mut self, index: usize, concrete: Token) {
        self.slot_mut(index).concrete = Some(concrete);
    }

    pub fn record_token(&mut self, index: usize, token: Token) {
        self.slot_mut(index).token = Some(token);
    }

    /// Index-wise merge; whatever `other` recorded wins on conflicts.
    pub fn merge(mut self, other: DependencyMetadata) -> Self {
        for (index, param) in other.params.into_iter().enumerate() {
            if let Some(concrete) = param.concrete {
                self.record_concrete(index, concrete);
            }
            if let Some(token) = param.token {
                self.record_token(index, token);
            }
        }
        self
    }

    /// One past the highest recorded index.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ParamDescriptor> {
        self.params.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter()
    }

    fn slot_mut(&mut self, index: usize) -> &mut ParamDescriptor {
        if index >= self.params.len() {
            self.params.resize_with(index + 1, ParamDescriptor::default);
        }
        &mut self.params[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;
    struct Cache;

    #[test]
    fn test_annotations_merge_by_index() {
        let metadata = DependencyMetadata::new()
            .typed::<Database>(0)
            .token(0, "DB_TOKEN")
            .typed::<Cache>(1);

        let first = metadata.get(0).unwrap();
        assert_eq!(first.concrete(), Some(&Token::of_type::<Database>()));
        assert_eq!(first.effective(), Some(&Token::from("DB_TOKEN")));
        assert_eq!(metadata.get(1).unwrap().effective(), Some(&Token::of_type::<Cache>()));
    }

    #[test]
    fn test_length_follows_highest_index() {
        let metadata = DependencyMetadata::new().token(3, "LATE");
        assert_eq!(metadata.len(), 4);
        assert!(metadata.get(1).unwrap().effective().is_none());
    }

    #[test]
    fn test_push_appends_after_highest_index() {
        let metadata = DependencyMetadata::new()
            .token(1, "SECOND")
            .push_typed::<Cache>();
        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata.get(2).unwrap().effective(), Some(&Token::of_type::<Cache>()));
    }

    #[test]
    fn test_merge_keeps_untouched_indices() {
        let base = DependencyMetadata::new().typed::<Database>(0).typed::<Cache>(1);
        let merged = base.merge(DependencyMetadata::new().token(1, "CACHE"));

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(0).unwrap().effective(), Some(&Token::of_type::<Database>()));
        let second = merged.get(1).unwrap();
        assert_eq!(second.concrete(), Some(&Token::of_type::<Cache>()));
        assert_eq!(second.effective(), Some(&Token::from("CACHE")));
    }
}
