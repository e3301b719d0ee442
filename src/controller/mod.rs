// Controllers are providers declared under a module's `controllers` list.
// The resolver registers each one in its module's container, exactly once,
// unless the module already declares a provider for the same token, and
// records it here so the application can resolve them after bootstrap.

use crate::di::{Constructor, Container, Injectable, Instance, Token};
use crate::error::{NestletError, Result};
use std::any::TypeId;
use std::sync::Arc;

/// A controller and the module container it was registered in.
#[derive(Clone, Debug)]
pub struct ControllerEntry {
    constructor: Constructor,
    module: &'static str,
    container: Arc<Container>,
}

impl ControllerEntry {
    pub(crate) fn new(constructor: Constructor, module: &'static str, container: Arc<Container>) -> Self {
        Self {
            constructor,
            module,
            container,
        }
    }

    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub fn name(&self) -> &'static str {
        self.constructor.name()
    }

    /// Name of the declaring module.
    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn resolve(&self) -> Result<Instance> {
        self.container
            .resolve_token(&Token::from(self.constructor))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ControllerRegistry {
    entries: Vec<ControllerEntry>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, entry: ControllerEntry) {
        tracing::debug!(
            controller = entry.name(),
            module = entry.module,
            "Registered controller"
        );
        self.entries.push(entry);
    }

    /// Controllers in registration order.
    pub fn entries(&self) -> &[ControllerEntry] {
        &self.entries
    }

    pub fn find<C: Injectable>(&self) -> Option<&ControllerEntry> {
        self.entries
            .iter()
            .find(|entry| entry.constructor.type_id() == TypeId::of::<C>())
    }

    /// Resolve controller `C` inside its module container.
    pub fn resolve<C: Injectable>(&self) -> Result<Arc<C>> {
        let entry = self.find::<C>().ok_or_else(|| NestletError::ProviderNotFound {
            token: std::any::type_name::<C>().to_string(),
        })?;
        entry
            .container
            .resolve::<C>()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
