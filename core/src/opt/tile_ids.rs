//! file: core/src/opt/tile_ids.rs
//! description: compile-time folding of tile names to numeric ids.
//!
//! Operands that name a tile (`mimic "door"`, `tell "door" to`) are
//! looked up in the export's tile table. A hit becomes
//! `Expr::ResolvedId`, which lowers to the bare id plus a comment, so the
//! generated code skips the runtime name lookup.
use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::ast::{Arg, Expr};

/// Known tile names and their ids. Consulted, never changed, while compiling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileTable {
    ids: HashMap<String, i64>,
}

impl TileTable {
    pub fn new() -> Self {
        TileTable::default()
    }

    pub fn insert(&mut self, name: &str, id: i64) {
        self.ids.insert(name.to_string(), id);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Build from the export's `tiles` array. Entries that are not objects
    /// with a string `name` and an integer `id` are skipped.
    pub fn from_json(tiles: &Value) -> Self {
        let mut table = TileTable::new();
        let Value::Array(entries) = tiles else {
            log::warn!("tile table is not an array; no tile names will be folded");
            return table;
        };
        for (i, entry) in entries.iter().enumerate() {
            let name = entry.get("name").and_then(Value::as_str);
            let id = entry.get("id").and_then(Value::as_i64);
            match (name, id) {
                (Some(name), Some(id)) => table.insert(name, id),
                _ => log::warn!("skipping peculiar entry {} in tiles table", i),
            }
        }
        table
    }
}

impl FromIterator<(String, i64)> for TileTable {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        TileTable { ids: iter.into_iter().collect() }
    }
}

/// Fold a string literal naming a known tile into a resolved id.
pub fn resolve_tile_ref<'a>(expr: &'a Expr, tiles: &TileTable) -> Cow<'a, Expr> {
    if let Expr::Str(name) = expr
        && let Some(id) = tiles.get(name)
    {
        log::trace!("folded tile '{}' to id {}", name, id);
        return Cow::Owned(Expr::ResolvedId { id, name: name.clone() });
    }
    Cow::Borrowed(expr)
}

pub fn resolve_tile_arg<'a>(arg: &'a Arg, tiles: &TileTable) -> Cow<'a, Arg> {
    match arg {
        Arg::Value(expr) => match resolve_tile_ref(expr, tiles) {
            Cow::Owned(resolved) => Cow::Owned(Arg::Value(resolved)),
            Cow::Borrowed(_) => Cow::Borrowed(arg),
        },
        _ => Cow::Borrowed(arg),
    }
}
