//! file: core/src/ast/expr.rs
//! description: decoding of expression and operand arrays.
//!
//! Literals map directly; tagged arrays map to `Expr` variants. An
//! unknown tag is kept as `Expr::Unknown` so lowering can report it and
//! carry on. A known tag with a missing payload is a `DecodeError`.
use serde_json::Value;

use super::err::DecodeError;
use super::kind::{Arg, CompareOp, Condition, Expr, ExprFunc};
use crate::error::CompileResult;
use crate::lower::naming::is_token;

const ISSUER: &str = "pulplua.ast.expr";

pub(crate) fn operand<'a>(items: &'a [Value], idx: usize, tag: &str) -> CompileResult<&'a Value> {
    items.get(idx).ok_or_else(|| {
        DecodeError::new(
            format!("'{}' is missing operand {}", tag, idx),
            ISSUER,
        )
        .boxed()
    })
}

pub(crate) fn operand_str<'a>(items: &'a [Value], idx: usize, tag: &str) -> CompileResult<&'a str> {
    match operand(items, idx, tag)? {
        Value::String(s) => Ok(s),
        other => Err(DecodeError::new(
            format!("'{}' expects a name at operand {}, found {}", tag, idx, other),
            ISSUER,
        )
        .boxed()),
    }
}

pub(crate) fn operand_index(items: &[Value], idx: usize, tag: &str) -> CompileResult<usize> {
    let v = operand(items, idx, tag)?;
    v.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            DecodeError::new(
                format!("'{}' expects an index at operand {}, found {}", tag, idx, v),
                ISSUER,
            )
            .boxed()
        })
}

/// Text of a tag that is not a string, for reporting.
pub(crate) fn tag_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn number_expr(n: &serde_json::Number) -> Expr {
    match n.as_i64() {
        Some(i) => Expr::Int(i),
        None => Expr::Float(n.as_f64().unwrap_or(0.0)),
    }
}

/// Decode a value in expression position.
pub fn decode_expr(value: &Value) -> CompileResult<Expr> {
    match value {
        Value::String(s) => Ok(Expr::Str(s.clone())),
        Value::Number(n) => Ok(number_expr(n)),
        Value::Null => Ok(Expr::Nil),
        Value::Bool(b) => Ok(Expr::Unknown(b.to_string())),
        Value::Object(_) => Ok(Expr::Unknown("object".to_string())),
        Value::Array(items) => decode_tagged_expr(items),
    }
}

fn decode_tagged_expr(items: &[Value]) -> CompileResult<Expr> {
    let tag = match items.first() {
        Some(Value::String(tag)) => tag.as_str(),
        other => return Ok(Expr::Unknown(tag_text(other))),
    };
    let payload = &items[1..];

    match tag {
        "get" => Ok(Expr::Get(operand_str(payload, 0, tag)?.to_string())),
        "optimized-id" => {
            let id = operand(payload, 0, tag)?.as_i64().ok_or_else(|| {
                DecodeError::new("'optimized-id' expects a numeric id".to_string(), ISSUER).boxed()
            })?;
            let name = operand_str(payload, 1, tag)?.to_string();
            Ok(Expr::ResolvedId { id, name })
        }
        "format" => {
            let parts = payload.iter().map(decode_expr).collect::<CompileResult<Vec<_>>>()?;
            Ok(Expr::Format(parts))
        }
        "embed" => Ok(Expr::Embed(Box::new(decode_expr(operand(payload, 0, tag)?)?))),
        "block" => Ok(Expr::Block(operand_index(payload, 0, tag)?)),
        other => match ExprFunc::from_name(other) {
            Some(func) => Ok(Expr::Func { func, args: decode_args(payload)? }),
            None => Ok(Expr::Unknown(other.to_string())),
        },
    }
}

impl Expr {
    pub fn decode(value: &Value) -> CompileResult<Expr> {
        decode_expr(value)
    }
}

impl Arg {
    pub fn decode(value: &Value) -> CompileResult<Arg> {
        decode_arg(value)
    }
}

/// Decode a call operand, recognising the `xy` and `rect` shapes.
pub fn decode_arg(value: &Value) -> CompileResult<Arg> {
    if let Value::Array(items) = value
        && let Some(Value::String(tag)) = items.first()
    {
        let payload = &items[1..];
        match tag.as_str() {
            "xy" => {
                let x = decode_expr(operand(payload, 0, tag)?)?;
                let y = decode_expr(operand(payload, 1, tag)?)?;
                return Ok(Arg::Xy(x, y));
            }
            "rect" => {
                let x = decode_expr(operand(payload, 0, tag)?)?;
                let y = decode_expr(operand(payload, 1, tag)?)?;
                let w = decode_expr(operand(payload, 2, tag)?)?;
                // some published games export a three-operand rect
                let h = match payload.get(3) {
                    Some(v) => Some(decode_expr(v)?),
                    None => None,
                };
                return Ok(Arg::Rect { x, y, w, h });
            }
            _ => {}
        }
    }
    Ok(Arg::Value(decode_expr(value)?))
}

pub fn decode_args(values: &[Value]) -> CompileResult<Vec<Arg>> {
    values.iter().map(decode_arg).collect()
}

/// Decode `[op, left, right]`. A bare-token left operand is a variable read.
pub fn decode_condition(value: &Value) -> CompileResult<Condition> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => {
            return Err(DecodeError::new(
                format!("condition must be an array, found {}", other),
                ISSUER,
            )
            .boxed());
        }
    };
    let tag = tag_text(items.first());
    let op = CompareOp::from_tag(&tag).ok_or_else(|| {
        DecodeError::new(format!("unrecognized comparison operator '{}'", tag), ISSUER).boxed()
    })?;
    let payload = &items[1..];
    let left = match operand(payload, 0, &tag)? {
        Value::String(name) if is_token(name) => Expr::Get(name.clone()),
        other => decode_expr(other)?,
    };
    let right = decode_expr(operand(payload, 1, &tag)?)?;
    Ok(Condition { op, left, right })
}

/// Decode a `["block", n]` reference into its index.
pub fn decode_block_ref(value: &Value) -> CompileResult<usize> {
    if let Value::Array(items) = value
        && let Some(Value::String(tag)) = items.first()
        && tag == "block"
    {
        return operand_index(&items[1..], 0, tag);
    }
    Err(DecodeError::new(
        format!("expected a block reference, found {}", value),
        ISSUER,
    )
    .boxed())
}
