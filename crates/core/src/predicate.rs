//! Filters over value-object fields
//!
//! - [`CompareOp`]: the six comparison operators
//! - [`Predicate`]: `field_path op literal`, evaluated in process
//! - [`ExtractionExpression`]: a compiled predicate a storage adapter
//!   evaluates over raw encoded strings (pushdown)
//!
//! Both forms share one comparison rule ([`CompareOp::test`]), so the
//! in-process path and every adapter agree on what "matches" means once the
//! field value has been extracted.

use crate::path::FieldPath;
use crate::value::{Primitive, PrimitiveKind};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// All operators, for iteration
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
    ];

    /// Operator as written in filters
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Operator in SQL
    pub fn sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            other => other.symbol(),
        }
    }

    /// Does `ordering` (lhs relative to rhs) satisfy the operator
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }

    /// Apply the operator
    ///
    /// Incomparable operands (mismatched kinds, NaN) never match, not even
    /// under `!=`. This mirrors SQL, where a comparison with NULL is never
    /// true.
    pub fn test(&self, lhs: &Primitive, rhs: &Primitive) -> bool {
        lhs.compare(rhs).map_or(false, |ord| self.holds(ord))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "=" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::Ne),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            other => Err(format!("unknown comparison operator '{}'", other)),
        }
    }
}

/// `field_path op literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field the predicate reads
    pub path: FieldPath,
    /// Comparison operator
    pub op: CompareOp,
    /// Right-hand side
    pub literal: Primitive,
}

impl Predicate {
    /// Create a predicate
    pub fn new(path: FieldPath, op: CompareOp, literal: impl Into<Primitive>) -> Self {
        Predicate {
            path,
            op,
            literal: literal.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.op, self.literal)
    }
}

/// Compiled, pushable predicate over an encoded column
///
/// Describes how a storage engine should extract the field from the raw
/// encoded string (`json_path`) and what to compare it with. Building one
/// never decodes a value. The literal has already been converted to the
/// field's kind.
///
/// # Examples
///
/// ```
/// use tessera_core::{CompareOp, ExtractionExpression, FieldPath, Primitive, PrimitiveKind};
///
/// let expr = ExtractionExpression::new(
///     "Money",
///     FieldPath::field("amount"),
///     PrimitiveKind::Float,
///     CompareOp::Gt,
///     Primitive::Float(100.0),
/// );
/// assert_eq!(expr.to_sql("value"), "json_extract(\"value\", '$.amount') > ?1");
/// assert!(expr.test(&Primitive::Float(150.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionExpression {
    type_id: String,
    path: FieldPath,
    kind: PrimitiveKind,
    op: CompareOp,
    literal: Primitive,
}

impl ExtractionExpression {
    /// Assemble an expression from already-validated parts
    pub fn new(
        type_id: impl Into<String>,
        path: FieldPath,
        kind: PrimitiveKind,
        op: CompareOp,
        literal: Primitive,
    ) -> Self {
        ExtractionExpression {
            type_id: type_id.into(),
            path,
            kind,
            op,
            literal,
        }
    }

    /// Type identifier of the column's value type
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Field path being extracted
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Extraction path in `$.a.b` form
    pub fn json_path(&self) -> String {
        self.path.to_json_path()
    }

    /// Declared kind of the extracted field
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Comparison operator
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Literal, already in the field's kind
    pub fn literal(&self) -> &Primitive {
        &self.literal
    }

    /// Apply the comparison to an extracted value
    pub fn test(&self, extracted: &Primitive) -> bool {
        self.op.test(extracted, &self.literal)
    }

    /// The uncompiled predicate this expression is equivalent to
    pub fn to_predicate(&self) -> Predicate {
        Predicate::new(self.path.clone(), self.op, self.literal.clone())
    }

    /// Render as an SQLite JSON1 condition over `column`
    ///
    /// The literal is not spliced into the text; it is parameter `?1`.
    /// Path segments are identifiers, so the quoted path needs no escaping.
    pub fn to_sql(&self, column: &str) -> String {
        format!(
            "json_extract(\"{}\", '{}') {} ?1",
            column.replace('"', "\"\""),
            self.json_path(),
            self.op.sql()
        )
    }
}

impl fmt::Display for ExtractionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extract({}, {}) {} {}",
            self.type_id,
            self.json_path(),
            self.op,
            self.literal
        )
    }
}
