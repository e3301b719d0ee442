use crate::di::{Arguments, Container, Injectable, Token};
use crate::error::Result;
use crate::module::ApplicationExtension;
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

/// String key/value configuration, seeded from the environment.
///
/// Clones share the same store. Unregistered, it is auto-constructed from
/// the full environment on first resolution.
#[derive(Clone, Default, Debug)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let service = Self::new();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    /// Only variables whose name starts with `prefix`; keys are kept whole.
    pub fn from_env_prefixed(prefix: &str) -> Self {
        let service = Self::new();
        for (key, value) in env::vars().filter(|(key, _)| key.starts_with(prefix)) {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// `None` when the key is missing or its value does not parse.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparsable config value");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.config.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }
}

impl Injectable for ConfigService {
    fn construct(_: &Arguments) -> Result<Self> {
        Ok(Self::from_env())
    }
}

/// Seeds a [`ConfigService`] singleton into the root container.
#[derive(Clone, Debug)]
pub struct ConfigExtension {
    service: ConfigService,
}

impl ConfigExtension {
    pub fn new(service: ConfigService) -> Self {
        Self { service }
    }

    pub fn from_env() -> Self {
        Self::new(ConfigService::from_env())
    }

    pub fn from_env_prefixed(prefix: &str) -> Self {
        Self::new(ConfigService::from_env_prefixed(prefix))
    }
}

impl ApplicationExtension for ConfigExtension {
    fn register(&self, container: &Container) -> Result<()> {
        tracing::debug!(entries = self.service.len(), "Registering ConfigService");
        container.register_instance(Token::of::<ConfigService>(), self.service.clone());
        Ok(())
    }
}
