//! file: core/src/opt/delegation.rs
//! description: single-delegation collapse.
//!
//! A handler whose only real command is `mimic <tile>` with the tile
//! folded to an id can be replaced by a direct table entry pointing at
//! the target's handler. Lowering records such handlers; the driver
//! decides whether to emit the table (see `glue::delegation_table`).
use serde::Serialize;

use super::tile_ids::{TileTable, resolve_tile_ref};
use crate::ast::{Command, Expr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationRecord {
    /// Script owning the handler.
    pub owner: String,
    pub event: String,
    pub target_id: i64,
    /// Tile name the id was folded from.
    pub target_name: String,
}

/// If `body` reduces to a single `mimic` of a folded tile, return its id
/// and name. Comments and blank lines are ignored.
pub fn single_delegation_target(body: &[Command], tiles: &TileTable) -> Option<(i64, String)> {
    let mut real = body.iter().filter(|c| !c.is_decoration());
    let only = real.next()?;
    if real.next().is_some() {
        return None;
    }
    let Command::Mimic(target) = only else {
        return None;
    };
    match resolve_tile_ref(target, tiles).as_ref() {
        Expr::ResolvedId { id, name } => Some((*id, name.clone())),
        _ => None,
    }
}
