//! Query execution over an encoded column
//!
//! A [`ValueQuery`] binds one column of a storage adapter to one value
//! type. Filters are compiled and handed to the adapter (pushdown); when the
//! adapter or the resolver cannot evaluate a filter, the query either
//! decodes every row and filters in process or reports the error, per
//! [`FallbackPolicy`].
//!
//! Both strategies return the same rows for the same data: the in-memory
//! path applies the same comparison rule to the same field values.

use crate::codec::Codec;
use crate::config::{FallbackPolicy, TesseraConfig};
use crate::container::Container;
use crate::projection::ProjectionResolver;
use crate::registry::{RegisteredType, TypeRegistry};
use crate::value_object::ValueObject;
use std::sync::Arc;
use tessera_core::{CompareOp, Error, FieldPath, Predicate, Primitive, Result, RowHandle, StorageAdapter};
use tracing::{debug, warn};

/// How a selection was evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The adapter evaluated the compiled expression
    Pushdown,
    /// Every row was decoded and filtered in process
    Fallback,
}

/// Rows matching a filter, ordered by handle
#[derive(Debug, Clone)]
pub struct Selection {
    /// Matching rows
    pub rows: Vec<(RowHandle, Container)>,
    /// How the filter was evaluated
    pub strategy: Strategy,
}

impl Selection {
    fn new(mut rows: Vec<(RowHandle, Container)>, strategy: Strategy) -> Self {
        rows.sort_by_key(|(handle, _)| *handle);
        Selection { rows, strategy }
    }

    /// Handles of the matching rows
    pub fn handles(&self) -> Vec<RowHandle> {
        self.rows.iter().map(|(h, _)| *h).collect()
    }

    /// Matching values
    pub fn values(&self) -> impl Iterator<Item = &Container> {
        self.rows.iter().map(|(_, c)| c)
    }

    /// Number of matching rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if nothing matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Typed access to one encoded column
pub struct ValueQuery<'a, A: StorageAdapter> {
    adapter: &'a A,
    codec: Codec<'a>,
    resolver: ProjectionResolver<'a>,
    column: String,
    ty: Arc<RegisteredType>,
    fallback: FallbackPolicy,
}

impl<'a, A: StorageAdapter> ValueQuery<'a, A> {
    /// Query `column` of `adapter` as values of `type_id`, default settings
    ///
    /// # Errors
    ///
    /// `UnknownType` if `type_id` is not registered.
    pub fn new(adapter: &'a A, registry: &'a TypeRegistry, column: &str, type_id: &str) -> Result<Self> {
        Self::with_config(adapter, registry, &TesseraConfig::default(), column, type_id)
    }

    /// Query with explicit configuration
    pub fn with_config(
        adapter: &'a A,
        registry: &'a TypeRegistry,
        config: &TesseraConfig,
        column: &str,
        type_id: &str,
    ) -> Result<Self> {
        let ty = Arc::clone(registry.resolve(type_id)?);
        Ok(ValueQuery {
            adapter,
            codec: Codec::with_limits(registry, config.limits.clone()),
            resolver: ProjectionResolver::with_max_depth(registry, config.max_pushdown_depth),
            column: column.to_string(),
            ty,
            fallback: config.fallback,
        })
    }

    /// Override the fallback policy
    pub fn fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    /// Column name
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Value type of the column
    pub fn type_id(&self) -> &str {
        self.ty.type_id()
    }

    /// Codec used to wrap and decode values
    pub fn codec(&self) -> &Codec<'a> {
        &self.codec
    }

    /// Store a container
    ///
    /// # Errors
    ///
    /// `SchemaMismatch` if the container holds another type, or the
    /// adapter's error.
    pub fn insert(&self, value: &Container) -> Result<RowHandle> {
        if value.type_id() != self.type_id() {
            return Err(Error::schema_mismatch(
                self.type_id(),
                format!("column '{}' cannot store '{}'", self.column, value.type_id()),
            ));
        }
        let handle = self.adapter.store(&self.column, value.encoded())?;
        debug!(target: "tessera::query", column = %self.column, handle = %handle, "Stored value");
        Ok(handle)
    }

    /// Wrap and store a Rust value object
    pub fn insert_value<T: ValueObject>(&self, value: &T) -> Result<RowHandle> {
        let container = Container::from_value(&self.codec, value)?;
        self.insert(&container)
    }

    /// Fetch and decode one row
    ///
    /// # Errors
    ///
    /// `NotFound`, `StorageError`, or `DecodeError` if the stored text is
    /// not a valid encoding of the column's type.
    pub fn get(&self, handle: RowHandle) -> Result<Container> {
        let encoded = self.adapter.fetch(&self.column, handle)?;
        Container::decode(&self.codec, encoded.as_str(), self.type_id()).map_err(|e| {
            warn!(
                target: "tessera::query",
                column = %self.column,
                handle = %handle,
                error = %e,
                "Stored value failed to decode"
            );
            e
        })
    }

    /// Decode every row
    pub fn scan(&self) -> Result<Vec<(RowHandle, Container)>> {
        self.adapter
            .scan(&self.column)?
            .into_iter()
            .map(|(handle, encoded)| {
                Container::decode(&self.codec, encoded.as_str(), self.type_id())
                    .map(|c| (handle, c))
                    .map_err(|e| {
                        warn!(
                            target: "tessera::query",
                            column = %self.column,
                            handle = %handle,
                            error = %e,
                            "Stored value failed to decode during scan"
                        );
                        e
                    })
            })
            .collect()
    }

    /// Rows matching `predicate`
    ///
    /// Pushes the filter down when possible. Otherwise, under
    /// [`FallbackPolicy::Automatic`], decodes and filters every row.
    ///
    /// # Errors
    ///
    /// - `UnknownField`, `InvalidLiteral`, or `UnsupportedProjection` when the
    ///   path ends on a value object; bad filters are never retried
    /// - `UnsupportedProjection` / `PushdownUnsupported` under
    ///   [`FallbackPolicy::Explicit`]
    /// - adapter and decode errors
    pub fn select(&self, predicate: &Predicate) -> Result<Selection> {
        // A path that is absent or ends on a value object fails the same way on every column
        self.ty.resolve_path(&predicate.path)?;

        let attempt = self
            .resolver
            .compile(self.type_id(), predicate)
            .and_then(|expr| {
                let matches = self.adapter.evaluate(&self.column, &expr)?;
                debug!(target: "tessera::query", column = %self.column, %expr, "Pushed down filter");
                matches
                    .map(|handle| self.get(handle).map(|c| (handle, c)))
                    .collect::<Result<Vec<_>>>()
            });

        match attempt {
            Ok(rows) => Ok(Selection::new(rows, Strategy::Pushdown)),
            Err(e) if e.is_fallback_trigger() => self.fall_back(predicate, e),
            Err(e) => Err(e),
        }
    }

    /// Rows where `path op literal`
    ///
    /// # Errors
    ///
    /// `InvalidPath` if `path` does not parse, otherwise as [`select`](Self::select).
    pub fn select_where(&self, path: &str, op: CompareOp, literal: impl Into<Primitive>) -> Result<Selection> {
        let path: FieldPath = path.parse()?;
        self.select(&Predicate::new(path, op, literal))
    }

    /// Rows matching `predicate`, always decoded and filtered in process
    pub fn select_in_memory(&self, predicate: &Predicate) -> Result<Vec<(RowHandle, Container)>> {
        let mut rows = Vec::new();
        for (handle, container) in self.scan()? {
            if self.resolver.matches(&container, predicate)? {
                rows.push((handle, container));
            }
        }
        Ok(rows)
    }

    fn fall_back(&self, predicate: &Predicate, cause: Error) -> Result<Selection> {
        match self.fallback {
            FallbackPolicy::Explicit => Err(cause),
            FallbackPolicy::Automatic => {
                debug!(
                    target: "tessera::query",
                    column = %self.column,
                    %predicate,
                    reason = %cause,
                    "Filtering in memory"
                );
                Ok(Selection::new(self.select_in_memory(predicate)?, Strategy::Fallback))
            }
        }
    }
}
