//! Type Registry
//!
//! Maps a stable type identifier to the declared schema of a value type and
//! the constructor that rebuilds instances of it.
//!
//! ## Lifecycle
//!
//! 1. Build a [`TypeRegistry`] during initialization and register every
//!    value type (nested types before the types that contain them).
//! 2. Either pass it around explicitly (`Arc<TypeRegistry>` / `&TypeRegistry`)
//!    or install it once as the process-wide registry with [`install_global`].
//! 3. After installation the registry is read-only; readers never lock.
//!
//! There is no removal: entries live as long as the registry.
//!
//! ```ignore
//! let mut registry = TypeRegistry::new();
//! registry.register_value::<Money>()?;
//! registry.register_value::<FullName>()?;
//! let registry = install_global(registry)?;
//! ```

use crate::value_object::ValueObject;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tessera_core::{Error, FieldDef, FieldKind, FieldPath, Instance, PrimitiveKind, Result, TypeSchema};
use tracing::{debug, info};

/// Constructor hook run on every decoded or wrapped instance
///
/// Receives an instance whose fields already match the schema (canonical
/// order, kinds checked) and returns the instance to keep, or a reason to
/// reject it. Constructors validate domain invariants; they should not
/// rewrite field values, or re-encoding would no longer reproduce the input.
pub type Constructor = Arc<dyn Fn(Instance) -> std::result::Result<Instance, String> + Send + Sync>;

/// A registered value type: schema, resolved nested types, constructor
pub struct RegisteredType {
    schema: TypeSchema,
    /// Resolved nested types, aligned with `schema.fields()`
    nested: Vec<Option<Arc<RegisteredType>>>,
    constructor: Constructor,
}

impl RegisteredType {
    /// Type identifier
    pub fn type_id(&self) -> &str {
        self.schema.type_id()
    }

    /// Declared schema
    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// Look up a field and its canonical position
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDef)> {
        self.schema
            .fields()
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
    }

    /// The registered type of the nested field at `index`
    pub fn nested_type(&self, index: usize) -> Option<&Arc<RegisteredType>> {
        self.nested.get(index).and_then(Option::as_ref)
    }

    /// Run the constructor hook
    pub fn construct(&self, instance: Instance) -> std::result::Result<Instance, String> {
        (self.constructor)(instance)
    }

    /// Kind of the primitive field `path` names
    ///
    /// # Errors
    ///
    /// `UnknownField` if a segment does not exist (or descends into a
    /// primitive), `UnsupportedProjection` if the path ends on a nested
    /// value rather than a primitive.
    pub fn resolve_path(&self, path: &FieldPath) -> Result<PrimitiveKind> {
        let unknown = || Error::UnknownField {
            type_id: self.type_id().to_string(),
            path: path.to_string(),
        };

        let segments = path.segments();
        let mut current = self;
        for (i, segment) in segments.iter().enumerate() {
            let (index, field) = current.field(segment).ok_or_else(unknown)?;
            let last = i + 1 == segments.len();
            match &field.kind {
                FieldKind::Nested(nested_id) if last => {
                    return Err(Error::UnsupportedProjection {
                        type_id: self.type_id().to_string(),
                        path: path.to_string(),
                        reason: format!("'{}' is a nested value '{}', not a primitive", segment, nested_id),
                    });
                }
                FieldKind::Nested(_) => {
                    current = current
                        .nested_type(index)
                        .map(Arc::as_ref)
                        .ok_or_else(unknown)?;
                }
                kind if last => return kind.primitive().ok_or_else(unknown),
                _ => return Err(unknown()),
            }
        }
        Err(unknown())
    }
}

impl fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredType")
            .field("schema", &self.schema)
            .finish()
    }
}

/// Registry of value types
#[derive(Default)]
pub struct TypeRegistry {
    types: FxHashMap<String, Arc<RegisteredType>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        TypeRegistry {
            types: FxHashMap::default(),
        }
    }

    /// Register a value type
    ///
    /// Re-registering an identical schema is a no-op and returns the
    /// existing entry (the first constructor is kept).
    ///
    /// # Errors
    ///
    /// - `InvalidSchema` if the schema breaks the identifier/field rules
    /// - `DuplicateType` if the identifier is taken by a different schema
    /// - `UnknownType` if a nested field references an unregistered type
    pub fn register(&mut self, schema: TypeSchema, constructor: Constructor) -> Result<Arc<RegisteredType>> {
        schema.validate().map_err(|reason| Error::InvalidSchema {
            type_id: schema.type_id().to_string(),
            reason,
        })?;

        if let Some(existing) = self.types.get(schema.type_id()) {
            if existing.schema == schema {
                debug!(target: "tessera::registry", type_id = schema.type_id(), "Type already registered");
                return Ok(Arc::clone(existing));
            }
            return Err(Error::DuplicateType(schema.type_id().to_string()));
        }

        let nested = schema
            .fields()
            .iter()
            .map(|field| match &field.kind {
                FieldKind::Nested(id) => self
                    .types
                    .get(id)
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| Error::UnknownType(id.clone())),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            target: "tessera::registry",
            type_id = schema.type_id(),
            fields = schema.len(),
            "Registered value type"
        );

        let entry = Arc::new(RegisteredType {
            schema,
            nested,
            constructor,
        });
        self.types
            .insert(entry.type_id().to_string(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Register a schema with the pass-through constructor
    pub fn register_schema(&mut self, schema: TypeSchema) -> Result<Arc<RegisteredType>> {
        self.register(schema, Arc::new(pass_through))
    }

    /// Register a Rust value type
    ///
    /// The constructor rebuilds `T` from the fields, so `T`'s own
    /// validation runs on every decode.
    pub fn register_value<T: ValueObject + 'static>(&mut self) -> Result<Arc<RegisteredType>> {
        let schema = T::schema();
        if schema.type_id() != T::TYPE_ID {
            return Err(Error::InvalidSchema {
                type_id: T::TYPE_ID.to_string(),
                reason: format!("schema declares identifier '{}'", schema.type_id()),
            });
        }
        self.register(
            schema,
            Arc::new(|instance: Instance| T::from_instance(&instance).map(|_| instance)),
        )
    }

    /// Look up a registered type
    ///
    /// # Errors
    ///
    /// `UnknownType` if the identifier is not registered.
    pub fn resolve(&self, type_id: &str) -> Result<&Arc<RegisteredType>> {
        self.types
            .get(type_id)
            .ok_or_else(|| Error::UnknownType(type_id.to_string()))
    }

    /// Check if a type is registered
    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered identifiers, sorted
    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.types.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("type_ids", &self.type_ids())
            .finish()
    }
}

fn pass_through(instance: Instance) -> std::result::Result<Instance, String> {
    Ok(instance)
}

/// Process-wide registry, written once
static GLOBAL_REGISTRY: OnceCell<TypeRegistry> = OnceCell::new();

/// Install `registry` as the process-wide registry
///
/// Call once during startup, after every type is registered and before any
/// concurrent reader exists. Reads afterwards take no lock.
///
/// # Errors
///
/// `RegistryInstalled` if a registry was already installed.
pub fn install_global(registry: TypeRegistry) -> Result<&'static TypeRegistry> {
    let count = registry.len();
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| Error::RegistryInstalled)?;
    info!(target: "tessera::registry", types = count, "Installed process-wide type registry");
    GLOBAL_REGISTRY.get().ok_or(Error::RegistryInstalled)
}

/// The process-wide registry, if installed
pub fn global_registry() -> Option<&'static TypeRegistry> {
    GLOBAL_REGISTRY.get()
}
