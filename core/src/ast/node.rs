//! file: core/src/ast/node.rs
//! description: the per-script block and comment tables.
//!
//! A script object in the export is a JSON map: event names point at
//! `["block", n]`, `__blocks` holds the flat table of block bodies and
//! `__comments` holds the comment text referenced by `#`/`#$` commands.
use serde_json::Value;

use super::err::DecodeError;
use super::expr::decode_block_ref;
use super::kind::Command;
use super::stmt::decode_block;
use crate::error::CompileResult;
use crate::location::Location;
use crate::lower::err::StructuralError;

const ISSUER: &str = "pulplua.ast.node";

pub type Block = Vec<Command>;

/// One event handler entry: event name and the index of its body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub event: String,
    pub block: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptSource {
    /// Name used in diagnostics.
    pub name: String,
    pub handlers: Vec<Handler>,
    pub blocks: Vec<Block>,
    pub comments: Vec<String>,
}

impl ScriptSource {
    pub fn new(name: &str, blocks: Vec<Block>, comments: Vec<String>) -> Self {
        ScriptSource {
            name: name.to_string(),
            handlers: Vec::new(),
            blocks,
            comments,
        }
    }

    /// Decode the `data` map of one exported script.
    pub fn from_json(name: &str, data: &Value) -> CompileResult<Self> {
        let map = match data {
            Value::Object(map) => map,
            Value::Null => return Ok(ScriptSource::new(name, Vec::new(), Vec::new())),
            other => {
                return Err(DecodeError::new(
                    format!("script '{}' data must be an object, found {}", name, other),
                    ISSUER,
                )
                .boxed());
            }
        };

        let mut blocks = Vec::new();
        if let Some(Value::Array(raw_blocks)) = map.get("__blocks") {
            for (i, raw) in raw_blocks.iter().enumerate() {
                let Value::Array(cmds) = raw else {
                    return Err(DecodeError::new(format!("block {} is not an array", i), ISSUER)
                        .at(Location::new(name.to_string(), i, 0))
                        .boxed());
                };
                blocks.push(decode_block(cmds)?);
            }
        }

        let comments = match map.get("__comments") {
            Some(Value::Array(raw)) => raw
                .iter()
                .map(|c| match c {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut source = ScriptSource::new(name, blocks, comments);
        for (key, value) in map.iter() {
            if key.starts_with("__") {
                continue;
            }
            let block = decode_block_ref(value)?;
            source.handlers.push(Handler { event: key.clone(), block });
        }
        log::debug!(
            "decoded script '{}': {} handlers, {} blocks",
            name,
            source.handlers.len(),
            source.blocks.len()
        );
        Ok(source)
    }

    /// Dereference a block index. A missing block is a structural defect.
    pub fn block(&self, idx: usize) -> CompileResult<&[Command]> {
        self.blocks.get(idx).map(|b| b.as_slice()).ok_or_else(|| {
            StructuralError::new(
                format!(
                    "block {} does not exist (table has {} blocks)",
                    idx,
                    self.blocks.len()
                ),
                "pulplua.ast.node.block",
            )
            .at(Location::new(self.name.clone(), idx, 0))
            .boxed()
        })
    }

    pub fn comment(&self, idx: usize) -> Option<&str> {
        self.comments.get(idx).map(|c| c.as_str())
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|h| h.event.as_str())
    }
}
