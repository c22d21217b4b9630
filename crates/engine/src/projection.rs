//! Field projection and predicate compilation
//!
//! The [`ProjectionResolver`] answers three questions about a field path:
//!
//! - what is its value in a container (`project`)
//! - does a container satisfy a predicate on it (`matches`, in process)
//! - how should a storage engine evaluate a predicate on it without
//!   decoding (`compile_predicate`, pushdown)
//!
//! Compilation validates the path against the schema, converts the literal
//! to the field's kind, and enforces the pushdown depth limit. It never
//! touches stored data.

use crate::container::Container;
use crate::registry::TypeRegistry;
use tessera_core::{
    CompareOp, Error, ExtractionExpression, FieldPath, Predicate, Primitive, PrimitiveKind, Result,
};

/// Deepest path compiled for pushdown unless configured otherwise
pub const DEFAULT_MAX_PUSHDOWN_DEPTH: usize = 2;

/// Resolves field paths against registered schemas
#[derive(Debug, Clone)]
pub struct ProjectionResolver<'r> {
    registry: &'r TypeRegistry,
    max_pushdown_depth: usize,
}

impl<'r> ProjectionResolver<'r> {
    /// Resolver with the default pushdown depth
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_max_depth(registry, DEFAULT_MAX_PUSHDOWN_DEPTH)
    }

    /// Resolver with a custom pushdown depth
    pub fn with_max_depth(registry: &'r TypeRegistry, max_pushdown_depth: usize) -> Self {
        ProjectionResolver {
            registry,
            max_pushdown_depth,
        }
    }

    /// Deepest path compiled for pushdown
    pub fn max_pushdown_depth(&self) -> usize {
        self.max_pushdown_depth
    }

    /// Kind of the primitive field `path` names in `type_id`
    pub fn field_kind(&self, type_id: &str, path: &FieldPath) -> Result<PrimitiveKind> {
        self.registry.resolve(type_id)?.resolve_path(path)
    }

    /// Primitive value at `path`
    ///
    /// # Errors
    ///
    /// `UnknownField` or `UnsupportedProjection`.
    pub fn project(&self, container: &Container, path: &FieldPath) -> Result<Primitive> {
        container.project(path)
    }

    /// Compile `path op literal` into a pushable expression
    ///
    /// # Errors
    ///
    /// - `UnknownType` if `type_id` is not registered
    /// - `UnknownField` if the path does not exist
    /// - `UnsupportedProjection` if the path names a nested value or is
    ///   deeper than the pushdown limit (the caller may fall back)
    /// - `InvalidLiteral` if the literal cannot be compared with the field
    pub fn compile_predicate(
        &self,
        type_id: &str,
        path: &FieldPath,
        op: CompareOp,
        literal: impl Into<Primitive>,
    ) -> Result<ExtractionExpression> {
        let kind = self.field_kind(type_id, path)?;
        if path.depth() > self.max_pushdown_depth {
            return Err(Error::UnsupportedProjection {
                type_id: type_id.to_string(),
                path: path.to_string(),
                reason: format!(
                    "path depth {} exceeds pushdown limit {}",
                    path.depth(),
                    self.max_pushdown_depth
                ),
            });
        }
        let literal = coerce_literal(path, kind, literal.into())?;
        Ok(ExtractionExpression::new(type_id, path.clone(), kind, op, literal))
    }

    /// Compile a [`Predicate`]
    pub fn compile(&self, type_id: &str, predicate: &Predicate) -> Result<ExtractionExpression> {
        self.compile_predicate(type_id, &predicate.path, predicate.op, predicate.literal.clone())
    }

    /// Evaluate a predicate against a container, in process
    ///
    /// No depth limit applies.
    ///
    /// # Errors
    ///
    /// `UnknownField`, `UnsupportedProjection` (nested value) or
    /// `InvalidLiteral`.
    pub fn matches(&self, container: &Container, predicate: &Predicate) -> Result<bool> {
        let kind = container.registered_type().resolve_path(&predicate.path)?;
        let literal = coerce_literal(&predicate.path, kind, predicate.literal.clone())?;
        let value = container.project(&predicate.path)?;
        Ok(predicate.op.test(&value, &literal))
    }

    /// Evaluate a compiled expression against a container, in process
    ///
    /// # Errors
    ///
    /// `SchemaMismatch` if the container holds another type.
    pub fn evaluate(&self, container: &Container, expr: &ExtractionExpression) -> Result<bool> {
        if container.type_id() != expr.type_id() {
            return Err(Error::schema_mismatch(
                expr.type_id(),
                format!("container holds '{}'", container.type_id()),
            ));
        }
        Ok(expr.test(&container.project(expr.path())?))
    }
}

/// Convert a literal to the field's kind
///
/// Integers widen to float when exact; nothing else converts.
fn coerce_literal(path: &FieldPath, kind: PrimitiveKind, literal: Primitive) -> Result<Primitive> {
    if let Primitive::Float(f) = literal {
        if !f.is_finite() {
            return Err(Error::InvalidLiteral {
                path: path.to_string(),
                reason: format!("non-finite float {}", f),
            });
        }
    }
    literal.coerce_to(kind).ok_or_else(|| Error::InvalidLiteral {
        path: path.to_string(),
        reason: format!("cannot compare {} field with {} literal {}", kind, literal.kind(), literal),
    })
}

/// A field path resolved once and reused across containers
///
/// Reads the in-memory value (`get`), filters in process (`test`), and
/// compiles pushdown expressions (`compile`) through the same resolved
/// path and kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessor {
    type_id: String,
    path: FieldPath,
    kind: PrimitiveKind,
}

impl FieldAccessor {
    /// Resolve `path` in `type_id`
    ///
    /// # Errors
    ///
    /// `UnknownType`, `UnknownField` or `UnsupportedProjection`.
    pub fn new(registry: &TypeRegistry, type_id: &str, path: FieldPath) -> Result<Self> {
        let kind = registry.resolve(type_id)?.resolve_path(&path)?;
        Ok(FieldAccessor {
            type_id: type_id.to_string(),
            path,
            kind,
        })
    }

    /// Type the path was resolved in
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Resolved path
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Declared kind of the field
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Read the field from a container
    pub fn get(&self, container: &Container) -> Result<Primitive> {
        if container.type_id() != self.type_id {
            return Err(Error::schema_mismatch(
                &self.type_id,
                format!("container holds '{}'", container.type_id()),
            ));
        }
        container.project(&self.path)
    }

    /// Compare the field of a container with `literal`, in process
    pub fn test(&self, container: &Container, op: CompareOp, literal: impl Into<Primitive>) -> Result<bool> {
        let literal = coerce_literal(&self.path, self.kind, literal.into())?;
        Ok(op.test(&self.get(container)?, &literal))
    }

    /// Uncompiled predicate on this field
    pub fn predicate(&self, op: CompareOp, literal: impl Into<Primitive>) -> Predicate {
        Predicate::new(self.path.clone(), op, literal)
    }

    /// Compile `field op literal` for pushdown
    pub fn compile(
        &self,
        resolver: &ProjectionResolver<'_>,
        op: CompareOp,
        literal: impl Into<Primitive>,
    ) -> Result<ExtractionExpression> {
        resolver.compile_predicate(&self.type_id, &self.path, op, literal)
    }
}
