// src/monitor/configuration.rs
use crate::probe::ProbeFailure;
use crate::registry::{
    BuiltinProvider, ConfigurationError, ProviderRegistry, ProviderSet, ProviderType,
};
use crate::runner::ErrorCallback;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Credentials for the transport layer's auth gate. Not interpreted here.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything a check cycle reads: active providers, the error callback and the
/// opaque auth credentials.
#[derive(Clone, Default)]
pub struct Configuration {
    registry: ProviderRegistry,
    pub error_callback: Option<ErrorCallback>,
    pub basic_auth_credentials: Option<BasicAuthCredentials>,
    pub(crate) configured: bool,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active providers in registration order.
    pub fn providers(&self) -> &ProviderSet {
        self.registry.active()
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Activates a provider by key (`"redis"`, `"database"`, or a custom key added earlier).
    pub fn use_provider(&mut self, key: &str) -> Result<ProviderType, ConfigurationError> {
        self.registry.register(key)
    }

    pub fn use_builtin(&mut self, provider: BuiltinProvider) -> ProviderType {
        self.registry.register_builtin(provider)
    }

    pub fn database(&mut self) -> ProviderType {
        self.use_builtin(BuiltinProvider::Database)
    }

    pub fn redis(&mut self) -> ProviderType {
        self.use_builtin(BuiltinProvider::Redis)
    }

    pub fn cache(&mut self) -> ProviderType {
        self.use_builtin(BuiltinProvider::Cache)
    }

    pub fn sidekiq(&mut self) -> ProviderType {
        self.use_builtin(BuiltinProvider::Sidekiq)
    }

    pub fn resque(&mut self) -> ProviderType {
        self.use_builtin(BuiltinProvider::Resque)
    }

    pub fn http(&mut self) -> ProviderType {
        self.use_builtin(BuiltinProvider::Http)
    }

    pub fn add_custom_service(
        &mut self,
        provider: ProviderType,
    ) -> Result<ProviderType, ConfigurationError> {
        self.registry.add_custom(provider)
    }

    /// Endpoint used by a built-in provider registered after this call.
    pub fn set_endpoint(&mut self, key: impl Into<String>, endpoint: impl Into<String>) {
        self.registry.set_endpoint(key, endpoint);
    }

    pub fn set_error_callback<F>(&mut self, callback: F)
    where
        F: Fn(&ProbeFailure) + Send + Sync + 'static,
    {
        self.error_callback = Some(Arc::new(callback));
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("providers", &self.providers().keys())
            .field("error_callback", &self.error_callback.is_some())
            .field("basic_auth_credentials", &self.basic_auth_credentials)
            .finish()
    }
}
