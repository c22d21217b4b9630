//! Strict reader
//!
//! Parsing is delegated to `serde_json`, but into a tree that keeps every
//! object member in input order, duplicates included. A plain map would
//! silently keep the last duplicate; here duplicates are a decode error.

use crate::registry::RegisteredType;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;
use tessera_core::{DecodeReason, FieldKind, FieldValue, Instance, Limits, Primitive, PrimitiveKind};

/// Parsed JSON, objects as ordered member lists
#[derive(Debug)]
enum Node {
    Null,
    Bool(bool),
    Int(i64),
    /// Integer above `i64::MAX`
    UInt,
    Float(f64),
    Text(String),
    Array,
    Object(Vec<(String, Node)>),
}

impl Node {
    fn describe(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Int(_) => "integer",
            Node::UInt => "out-of-range integer",
            Node::Float(_) => "float",
            Node::Text(_) => "text",
            Node::Array => "array",
            Node::Object(_) => "object",
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(i64::try_from(v).map_or(Node::UInt, Node::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        while seq.next_element::<Node>()?.is_some() {}
        Ok(Node::Array)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(4));
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            members.push((key, value));
        }
        Ok(Node::Object(members))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

/// Decode `text` as an instance of `ty`
pub(super) fn read_value(ty: &RegisteredType, text: &str, limits: &Limits) -> Result<Instance, DecodeReason> {
    let node: Node = serde_json::from_str(text).map_err(|e| DecodeReason::Malformed(e.to_string()))?;
    match node {
        Node::Object(members) => build(ty, members, "", limits),
        other => Err(DecodeReason::Malformed(format!(
            "expected an object, found {}",
            other.describe()
        ))),
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Validate members against the schema and run the constructor
///
/// Error field names are qualified with `prefix` so nested failures read
/// as `owner.first`.
fn build(
    ty: &RegisteredType,
    members: Vec<(String, Node)>,
    prefix: &str,
    limits: &Limits,
) -> Result<Instance, DecodeReason> {
    let schema = ty.schema();
    let mut slots: Vec<Option<FieldValue>> = vec![None; schema.len()];

    for (key, node) in members {
        let index = schema
            .position(&key)
            .ok_or_else(|| DecodeReason::UnexpectedField(qualify(prefix, &key)))?;
        if slots[index].is_some() {
            return Err(DecodeReason::DuplicateField(qualify(prefix, &key)));
        }

        let field = &schema.fields()[index];
        let mismatch = |found: &'static str| DecodeReason::KindMismatch {
            field: qualify(prefix, &key),
            expected: field.kind.clone(),
            found,
        };

        let value = match (&field.kind, node) {
            (FieldKind::Nested(_), Node::Object(inner)) => {
                let nested = ty.nested_type(index).ok_or_else(|| {
                    DecodeReason::Malformed(format!("nested type of '{}' is not resolved", field.name))
                })?;
                FieldValue::Nested(build(nested, inner, &qualify(prefix, &key), limits)?)
            }
            (FieldKind::Nested(_), other) => return Err(mismatch(other.describe())),
            (kind, node) => {
                let expected = kind.primitive().ok_or_else(|| mismatch(node.describe()))?;
                let primitive = read_primitive(expected, node).map_err(mismatch)?;
                if let Primitive::Text(s) = &primitive {
                    if s.len() > limits.max_text_bytes {
                        return Err(DecodeReason::TooLarge {
                            size: s.len(),
                            max: limits.max_text_bytes,
                        });
                    }
                }
                FieldValue::Primitive(primitive)
            }
        };
        slots[index] = Some(value);
    }

    let mut fields = Vec::with_capacity(schema.len());
    for (field, slot) in schema.fields().iter().zip(slots) {
        match slot {
            Some(value) => fields.push((field.name.clone(), value)),
            None => return Err(DecodeReason::MissingField(qualify(prefix, &field.name))),
        }
    }

    ty.construct(Instance::new(ty.type_id(), fields))
        .map_err(DecodeReason::Rejected)
}

/// Convert a scalar node to `kind`, or describe what was found
fn read_primitive(kind: PrimitiveKind, node: Node) -> Result<Primitive, &'static str> {
    match (kind, node) {
        (PrimitiveKind::Integer, Node::Int(i)) => Ok(Primitive::Int(i)),
        (PrimitiveKind::Float, Node::Float(f)) => Ok(Primitive::Float(f)),
        (PrimitiveKind::Float, Node::Int(i)) => Primitive::Int(i)
            .coerce_to(PrimitiveKind::Float)
            .ok_or("integer not exactly representable as float"),
        (PrimitiveKind::Text, Node::Text(s)) => Ok(Primitive::Text(s)),
        (PrimitiveKind::Boolean, Node::Bool(b)) => Ok(Primitive::Bool(b)),
        (_, other) => Err(other.describe()),
    }
}
