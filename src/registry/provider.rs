// src/registry/provider.rs
use crate::clock::{Clock, SystemClock};
use crate::probe::Probe;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use super::BuiltinProvider;

type ProbeFactory = dyn Fn(Arc<dyn Clock>) -> Box<dyn Probe> + Send + Sync;

/// A registrable kind of probe: a key, a display type name and a way to build
/// instances of it. Two provider types are the same provider when their keys match.
#[derive(Clone)]
pub struct ProviderType {
    key: String,
    type_name: String,
    builtin: Option<BuiltinProvider>,
    probe_type: TypeId,
    factory: Arc<ProbeFactory>,
}

impl ProviderType {
    pub(crate) fn builtin(provider: BuiltinProvider, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            key: provider.key().to_string(),
            type_name: type_name_for(provider.key()),
            builtin: Some(provider),
            probe_type: TypeId::of::<BuiltinProvider>(),
            factory: Arc::new(move |clock: Arc<dyn Clock>| {
                provider.instantiate(&endpoint, clock)
            }),
        }
    }

    /// A provider type built from a factory closure. Validation happens when it is
    /// handed to [`ProviderRegistry::add_custom`](super::ProviderRegistry::add_custom).
    pub fn custom<P, F>(key: impl Into<String>, factory: F) -> Self
    where
        P: Probe + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        let key = key.into();
        Self {
            type_name: type_name_for(&key),
            key,
            builtin: None,
            probe_type: TypeId::of::<P>(),
            factory: Arc::new(move |_: Arc<dyn Clock>| Box::new(factory()) as Box<dyn Probe>),
        }
    }

    /// Shorthand for stateless probes with a `Default` impl.
    pub fn of<P>(key: impl Into<String>) -> Self
    where
        P: Probe + Default + 'static,
    {
        Self::custom(key, P::default)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn builtin_kind(&self) -> Option<BuiltinProvider> {
        self.builtin
    }

    /// Whether both types build the same probe type.
    pub fn same_probe_type(&self, other: &ProviderType) -> bool {
        self.probe_type == other.probe_type
    }

    pub fn instantiate(&self) -> Box<dyn Probe> {
        self.instantiate_with(Arc::new(SystemClock))
    }

    /// Builds a probe whose timestamps come from `clock`. Custom probes ignore it.
    pub fn instantiate_with(&self, clock: Arc<dyn Clock>) -> Box<dyn Probe> {
        (self.factory)(clock)
    }
}

impl PartialEq for ProviderType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ProviderType {}

impl fmt::Debug for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderType")
            .field("key", &self.key)
            .field("type_name", &self.type_name)
            .field("builtin", &self.builtin.is_some())
            .finish()
    }
}

// `redis` -> `Redis`
fn type_name_for(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Insertion-ordered set of provider types, unique by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSet {
    items: Vec<ProviderType>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a provider with the same key is already present.
    pub fn insert(&mut self, provider: ProviderType) -> bool {
        if self.contains_key(provider.key()) {
            return false;
        }
        self.items.push(provider);
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.iter().any(|p| p.key() == key)
    }

    pub fn get(&self, key: &str) -> Option<&ProviderType> {
        self.items.iter().find(|p| p.key() == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProviderType> {
        self.items.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().map(|p| p.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProviderSet {
    type Item = &'a ProviderType;
    type IntoIter = std::slice::Iter<'a, ProviderType>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
