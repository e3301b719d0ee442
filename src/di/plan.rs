use crate::di::{Constructor, Token};
use crate::error::{NestletError, Result};

/// Wiring of one constructor: the token resolved for every parameter slot.
///
/// Plans are built once per (container, constructor) and reused, so resolving
/// a transient type repeatedly only rebuilds instances, not wiring.
#[derive(Debug, Clone)]
pub struct DependencyPlan {
    constructor: &'static str,
    slots: Vec<Token>,
}

impl DependencyPlan {
    /// Derive the plan from the constructor's declared metadata.
    ///
    /// # Errors
    /// [`NestletError::UnresolvableDependency`] for the first parameter that
    /// has neither an explicit token nor a concrete type.
    pub fn build(constructor: &Constructor) -> Result<Self> {
        let metadata = constructor.dependencies();
        let slots = metadata
            .iter()
            .enumerate()
            .map(|(index, param)| {
                param
                    .effective()
                    .cloned()
                    .ok_or(NestletError::UnresolvableDependency {
                        constructor: constructor.name(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            constructor: constructor.name(),
            slots,
        })
    }

    pub fn constructor(&self) -> &'static str {
        self.constructor
    }

    pub fn slots(&self) -> &[Token] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::{Arguments, DependencyMetadata, Injectable};

    struct Database;

    struct Gappy;

    impl Injectable for Gappy {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().typed::<Database>(0).token(2, "LATE")
        }

        fn construct(_: &Arguments) -> Result<Self> {
            Ok(Gappy)
        }
    }

    struct Tagged;

    impl Injectable for Tagged {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().typed::<Database>(0).token(0, "DB_TOKEN")
        }

        fn construct(_: &Arguments) -> Result<Self> {
            Ok(Tagged)
        }
    }

    #[test]
    fn test_hole_reports_constructor_and_index() {
        let err = DependencyPlan::build(&Constructor::of::<Gappy>()).unwrap_err();
        match err {
            NestletError::UnresolvableDependency { constructor, index } => {
                assert!(constructor.ends_with("Gappy"));
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_token_beats_concrete_type() {
        let plan = DependencyPlan::build(&Constructor::of::<Tagged>()).unwrap();
        assert_eq!(plan.slots(), &[Token::from("DB_TOKEN")]);
    }
}
