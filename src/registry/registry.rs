// src/registry/registry.rs
use std::collections::HashMap;
use tracing::debug;

use super::{BuiltinProvider, ConfigurationError, ProviderSet, ProviderType};

/// Known provider types plus the active set that runs on every check.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    endpoints: HashMap<String, String>,
    custom: ProviderSet,
    active: ProviderSet,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint for a built-in provider registered after this call.
    pub fn set_endpoint(&mut self, key: impl Into<String>, endpoint: impl Into<String>) {
        self.endpoints.insert(key.into(), endpoint.into());
    }

    pub fn endpoint(&self, provider: BuiltinProvider) -> &str {
        self.endpoints
            .get(provider.key())
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_endpoint())
    }

    /// Resolves `key` to a built-in or previously added custom type.
    pub fn resolve(&self, key: &str) -> Option<ProviderType> {
        if let Some(builtin) = BuiltinProvider::from_key(key) {
            return Some(ProviderType::builtin(builtin, self.endpoint(builtin)));
        }
        self.custom.get(key).cloned()
    }

    /// Activates the provider registered under `key`.
    pub fn register(&mut self, key: &str) -> Result<ProviderType, ConfigurationError> {
        if let Some(builtin) = BuiltinProvider::from_key(key) {
            return Ok(self.register_builtin(builtin));
        }

        let provider = self
            .custom
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownProvider { key: key.to_string() })?;
        if self.active.insert(provider.clone()) {
            debug!("Registered custom provider {}", provider.type_name());
        }
        Ok(provider)
    }

    /// Activates a built-in provider; cannot fail since the key is known.
    pub fn register_builtin(&mut self, builtin: BuiltinProvider) -> ProviderType {
        if let Some(existing) = self.active.get(builtin.key()) {
            return existing.clone();
        }

        let provider = ProviderType::builtin(builtin, self.endpoint(builtin));
        if self.active.insert(provider.clone()) {
            debug!("Registered provider {}", provider.type_name());
        }
        provider
    }

    /// Validates and activates a custom provider type, returning it unchanged.
    /// Adding the same probe type under the same key again is a no-op; a different
    /// probe type under a taken key is rejected.
    pub fn add_custom(&mut self, provider: ProviderType) -> Result<ProviderType, ConfigurationError> {
        validate_custom(&provider)?;

        if let Some(existing) = self.custom.get(provider.key()) {
            if !existing.same_probe_type(&provider) {
                return Err(ConfigurationError::InvalidProvider {
                    name: provider.key().to_string(),
                    reason: "key already registered".into(),
                });
            }
            let existing = existing.clone();
            self.active.insert(existing.clone());
            return Ok(existing);
        }

        self.custom.insert(provider.clone());
        if self.active.insert(provider.clone()) {
            debug!("Registered custom provider {}", provider.type_name());
        }
        Ok(provider)
    }

    pub fn active(&self) -> &ProviderSet {
        &self.active
    }
}

fn validate_custom(provider: &ProviderType) -> Result<(), ConfigurationError> {
    let key = provider.key();
    let invalid = |reason: String| ConfigurationError::InvalidProvider {
        name: key.to_string(),
        reason,
    };

    if provider.builtin_kind().is_some() {
        return Err(invalid("built-in providers are registered by key".into()));
    }
    if key.is_empty() {
        return Err(invalid("provider key must not be empty".into()));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(invalid(
            "provider key must contain only lower-case letters, digits and '_'".into(),
        ));
    }
    if BuiltinProvider::from_key(key).is_some() {
        return Err(invalid("key is reserved for a built-in provider".into()));
    }

    let probe = provider.instantiate();
    if probe.name() != key {
        return Err(invalid(format!(
            "probe reports name '{}' but is registered as '{}'",
            probe.name(),
            key
        )));
    }

    Ok(())
}
