//! file: core/src/ast/stmt.rs
//! description: decoding of command arrays.
//!
//! Turns one exported command (`["if", cond, ["block", 3], ["else", ...]]`)
//! into a `Command`. Shape violations the front end is supposed to rule
//! out are fatal; an unknown tag is kept for soft reporting.
use serde_json::Value;

use super::err::DecodeError;
use super::expr::{
    decode_arg, decode_args, decode_block_ref, decode_condition, decode_expr, operand,
    operand_index, operand_str, tag_text,
};
use super::kind::{AssignOp, Branch, CallTarget, Command, StmtFunc};
use crate::error::CompileResult;
use crate::lower::naming::is_token;

const ISSUER: &str = "pulplua.ast.stmt";

/// Decode one command. Returns `Ok(None)` for entries that are not arrays;
/// the exporter interleaves those with real commands and they carry nothing.
pub fn decode_command(value: &Value) -> CompileResult<Option<Command>> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        _ => return Ok(None),
    };
    let tag = match items.first() {
        Some(Value::String(tag)) => tag.as_str(),
        other => return Ok(Some(Command::Unknown(tag_text(other)))),
    };
    let payload = &items[1..];

    if let Some(op) = AssignOp::from_tag(tag) {
        let target = operand_str(payload, 0, tag)?.to_string();
        let value = decode_expr(operand(payload, 1, tag)?)?;
        return Ok(Some(Command::Assign { op, target, value }));
    }

    let cmd = match tag {
        "_" => Command::Blank,
        "done" => Command::Done,
        "inc" => Command::Inc(operand_str(payload, 0, tag)?.to_string()),
        "dec" => Command::Dec(operand_str(payload, 0, tag)?.to_string()),
        "random" => match payload {
            [low] => Command::Random { low: decode_expr(low)?, high: None },
            [low, high] => Command::Random {
                low: decode_expr(low)?,
                high: Some(decode_expr(high)?),
            },
            _ => {
                return Err(DecodeError::new(
                    format!("wrong number of arguments for 'random': {}", payload.len()),
                    ISSUER,
                )
                .boxed());
            }
        },
        "if" => Command::If {
            cond: decode_condition(operand(payload, 0, tag)?)?,
            body: decode_block_ref(operand(payload, 1, tag)?)?,
            branches: decode_branches(&payload[payload.len().min(2)..])?,
        },
        "while" => {
            if payload.len() > 2 {
                return Err(DecodeError::new(
                    "'while' does not take elseif/else continuations".to_string(),
                    ISSUER,
                )
                .boxed());
            }
            Command::While {
                cond: decode_condition(operand(payload, 0, tag)?)?,
                body: decode_block_ref(operand(payload, 1, tag)?)?,
            }
        }
        "call" => match operand(payload, 0, tag)? {
            Value::String(name) if is_token(name) => Command::Call(CallTarget::Name(name.clone())),
            other => Command::Call(CallTarget::Expr(decode_expr(other)?)),
        },
        "emit" => Command::Emit(decode_expr(operand(payload, 0, tag)?)?),
        "mimic" => Command::Mimic(decode_expr(operand(payload, 0, tag)?)?),
        "tell" => Command::Tell {
            target: decode_arg(operand(payload, 0, tag)?)?,
            rest: decode_args(&payload[1..])?,
        },
        "#" | "#$" => Command::Comment {
            index: operand_index(payload, 0, tag)?,
            inline: tag == "#$",
        },
        other => match StmtFunc::from_name(other) {
            Some(func) => Command::Builtin { func, args: decode_args(payload)? },
            None => Command::Unknown(other.to_string()),
        },
    };
    Ok(Some(cmd))
}

impl Command {
    pub fn decode(value: &Value) -> CompileResult<Option<Command>> {
        decode_command(value)
    }
}

fn decode_branches(values: &[Value]) -> CompileResult<Vec<Branch>> {
    values.iter().map(decode_branch).collect()
}

fn decode_branch(value: &Value) -> CompileResult<Branch> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => {
            return Err(DecodeError::new(
                format!("unrecognized block followup {}", other),
                ISSUER,
            )
            .boxed());
        }
    };
    let tag = tag_text(items.first());
    let payload = items.get(1..).unwrap_or(&[]);
    match tag.as_str() {
        "elseif" => Ok(Branch::ElseIf {
            cond: decode_condition(operand(payload, 0, &tag)?)?,
            body: decode_block_ref(operand(payload, 1, &tag)?)?,
            branches: decode_branches(&payload[payload.len().min(2)..])?,
        }),
        "else" => Ok(Branch::Else {
            body: decode_block_ref(operand(payload, 0, &tag)?)?,
        }),
        other => Err(DecodeError::new(
            format!("unrecognized block followup '{}'", other),
            ISSUER,
        )
        .boxed()),
    }
}

/// Decode a whole block body, skipping non-array entries.
pub fn decode_block(values: &[Value]) -> CompileResult<Vec<Command>> {
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        if let Some(cmd) = decode_command(v)? {
            out.push(cmd);
        }
    }
    Ok(out)
}
