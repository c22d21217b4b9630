//! Canonical writer

use crate::registry::RegisteredType;
use tessera_core::{FieldKind, FieldValue, Instance, Limits, Primitive, PrimitiveKind};

/// Append the canonical encoding of `instance` to `out`
///
/// Returns a human-readable reason on failure; the caller attaches the
/// type identifier.
pub(super) fn write_value(
    ty: &RegisteredType,
    instance: &Instance,
    limits: &Limits,
    out: &mut String,
) -> Result<(), String> {
    if instance.type_id() != ty.type_id() {
        return Err(format!(
            "instance of '{}' where '{}' was expected",
            instance.type_id(),
            ty.type_id()
        ));
    }

    let schema = ty.schema();
    if let Some(extra) = instance.field_names().find(|name| schema.position(name).is_none()) {
        return Err(format!("unexpected field '{}'", extra));
    }
    if instance.len() > schema.len() {
        return Err("duplicate field".to_string());
    }

    out.push('{');
    for (index, field) in schema.fields().iter().enumerate() {
        let value = instance
            .get(&field.name)
            .ok_or_else(|| format!("missing field '{}'", field.name))?;

        if index > 0 {
            out.push(',');
        }
        write_text(&field.name, out)?;
        out.push(':');

        match (&field.kind, value) {
            (FieldKind::Nested(_), FieldValue::Nested(inner)) => {
                let nested = ty
                    .nested_type(index)
                    .ok_or_else(|| format!("nested type of '{}' is not resolved", field.name))?;
                write_value(nested, inner, limits, out)
                    .map_err(|reason| format!("{}: {}", field.name, reason))?;
            }
            (kind, FieldValue::Primitive(p)) => {
                let expected = kind.primitive().ok_or_else(|| {
                    format!("field '{}' expected {}, found {}", field.name, kind, value.describe())
                })?;
                write_primitive(&field.name, expected, p, limits, out)?;
            }
            (kind, FieldValue::Nested(_)) => {
                return Err(format!(
                    "field '{}' expected {}, found {}",
                    field.name,
                    kind,
                    value.describe()
                ));
            }
        }
    }
    out.push('}');
    Ok(())
}

fn write_primitive(
    name: &str,
    kind: PrimitiveKind,
    value: &Primitive,
    limits: &Limits,
    out: &mut String,
) -> Result<(), String> {
    if let Primitive::Float(f) = value {
        if !f.is_finite() {
            return Err(format!("field '{}' holds non-finite float {}", name, f));
        }
    }

    let coerced = value.coerce_to(kind).ok_or_else(|| {
        format!("field '{}' expected {}, found {}", name, kind, value.kind())
    })?;

    match coerced {
        Primitive::Int(i) => out.push_str(&i.to_string()),
        Primitive::Float(f) => write_float(f, out)?,
        Primitive::Text(s) => {
            limits
                .validate_text(&s)
                .map_err(|e| format!("field '{}': {}", name, e))?;
            write_text(&s, out)?;
        }
        Primitive::Bool(b) => out.push_str(if b { "true" } else { "false" }),
    }
    Ok(())
}

/// Shortest round-trip form; `-0.0` is written as `0.0`
fn write_float(f: f64, out: &mut String) -> Result<(), String> {
    let f = if f == 0.0 { 0.0 } else { f };
    let text = serde_json::to_string(&f).map_err(|e| e.to_string())?;
    out.push_str(&text);
    Ok(())
}

fn write_text(s: &str, out: &mut String) -> Result<(), String> {
    let text = serde_json::to_string(s).map_err(|e| e.to_string())?;
    out.push_str(&text);
    Ok(())
}
