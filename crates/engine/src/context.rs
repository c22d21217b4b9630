//! Registry and configuration bundled for application code
//!
//! [`Tessera`] is the entry point most callers need: it hands out codecs,
//! resolvers and column queries that all share one registry and one
//! configuration.

use crate::codec::Codec;
use crate::config::TesseraConfig;
use crate::container::Container;
use crate::projection::ProjectionResolver;
use crate::query::ValueQuery;
use crate::registry::{global_registry, TypeRegistry};
use crate::value_object::ValueObject;
use std::path::Path;
use tessera_core::{EncodedForm, Error, Instance, Result, StorageAdapter};
use tracing::info;

/// A registry plus the settings every component built from it uses
#[derive(Debug, Clone)]
pub struct Tessera<'r> {
    registry: &'r TypeRegistry,
    config: TesseraConfig,
}

impl<'r> Tessera<'r> {
    /// Bind a registry and a validated configuration
    ///
    /// # Errors
    ///
    /// `Config` if the configuration is invalid.
    pub fn new(registry: &'r TypeRegistry, config: TesseraConfig) -> Result<Self> {
        config.validate()?;
        Ok(Tessera { registry, config })
    }

    /// Bind a registry, reading `tessera.toml` from `dir` when present
    pub fn open(registry: &'r TypeRegistry, dir: &Path) -> Result<Self> {
        let config = TesseraConfig::load_or_default(dir)?;
        info!(
            target: "tessera::config",
            dir = ?dir,
            fallback = ?config.fallback,
            max_pushdown_depth = config.max_pushdown_depth,
            "Loaded configuration"
        );
        Self::new(registry, config)
    }

    /// Registry in use
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Configuration in use
    pub fn config(&self) -> &TesseraConfig {
        &self.config
    }

    /// Codec with the configured limits
    pub fn codec(&self) -> Codec<'r> {
        Codec::with_limits(self.registry, self.config.limits.clone())
    }

    /// Resolver with the configured pushdown depth
    pub fn resolver(&self) -> ProjectionResolver<'r> {
        ProjectionResolver::with_max_depth(self.registry, self.config.max_pushdown_depth)
    }

    /// Encode an instance
    pub fn encode(&self, instance: &Instance) -> Result<EncodedForm> {
        self.codec().encode(instance)
    }

    /// Decode text as `type_id`
    pub fn decode(&self, text: &str, type_id: &str) -> Result<Instance> {
        self.codec().decode(text, type_id)
    }

    /// Wrap an instance in a container
    pub fn wrap(&self, instance: Instance) -> Result<Container> {
        Container::new(&self.codec(), instance)
    }

    /// Wrap a Rust value object in a container
    pub fn wrap_value<T: ValueObject>(&self, value: &T) -> Result<Container> {
        Container::from_value(&self.codec(), value)
    }

    /// Query `column` of `adapter` as values of `type_id`
    pub fn query<'a, A: StorageAdapter>(
        &'a self,
        adapter: &'a A,
        column: &str,
        type_id: &str,
    ) -> Result<ValueQuery<'a, A>> {
        ValueQuery::with_config(adapter, self.registry, &self.config, column, type_id)
    }
}

impl Tessera<'static> {
    /// Bind the process-wide registry
    ///
    /// # Errors
    ///
    /// `Config` if no registry has been installed or the configuration is
    /// invalid.
    pub fn global(config: TesseraConfig) -> Result<Self> {
        let registry = global_registry()
            .ok_or_else(|| Error::config("no process-wide type registry is installed"))?;
        Self::new(registry, config)
    }
}
