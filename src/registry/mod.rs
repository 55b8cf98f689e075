// src/registry/mod.rs
mod builtin;
mod error;
mod provider;
mod registry;

pub use builtin::BuiltinProvider;
pub use error::ConfigurationError;
pub use provider::{ProviderSet, ProviderType};
pub use registry::ProviderRegistry;
