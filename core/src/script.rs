//! file: core/src/script.rs
//! description: script naming, registry slots and whole-script compilation.
//!
//! Each exported script belongs to the game, a room or a tile. The
//! registry gives it a unique name and a `__script[n]` slot; compiling it
//! emits the runtime registration followed by every handler.
use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::ast::ScriptSource;
use crate::error::CompileResult;
use crate::lower::naming::quote;
use crate::lower::{TranspileContext, compile_handler};

const ISSUER: &str = "pulplua.script";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScriptKind {
    Global,
    Room,
    Tile,
}

impl ScriptKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ScriptKind::Global),
            1 => Some(ScriptKind::Room),
            2 => Some(ScriptKind::Tile),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ScriptKind::Global => 0,
            ScriptKind::Room => 1,
            ScriptKind::Tile => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptKind::Global => "global",
            ScriptKind::Room => "room",
            ScriptKind::Tile => "tile",
        }
    }
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered script: its unique name and registry slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptEntry {
    pub name: String,
    pub kind: ScriptKind,
    pub id: i64,
    /// Lua expression of the registry slot, e.g. `__script[3]`.
    pub slot: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    rooms: Vec<Option<String>>,
    tiles: Vec<Option<String>>,
    taken: HashSet<String>,
    next_slot: usize,
}

fn names_of(entries: Option<&Value>) -> Vec<Option<String>> {
    match entries {
        Some(Value::Array(items)) => items
            .iter()
            .map(|e| e.get("name").and_then(Value::as_str).map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

impl ScriptRegistry {
    /// `rooms[i]` / `tiles[i]` name the room or tile with id `i`.
    pub fn new(rooms: Vec<Option<String>>, tiles: Vec<Option<String>>) -> Self {
        ScriptRegistry {
            rooms,
            tiles,
            taken: HashSet::new(),
            next_slot: 1,
        }
    }

    /// Read room and tile names from the game export.
    pub fn from_json(export: &Value) -> Self {
        ScriptRegistry::new(names_of(export.get("rooms")), names_of(export.get("tiles")))
    }

    fn base_name(&self, kind: ScriptKind, id: i64, ctx: &mut TranspileContext) -> String {
        let index = usize::try_from(id).ok();
        let known = match kind {
            ScriptKind::Global if id == 0 => Some("game".to_string()),
            ScriptKind::Global => None,
            ScriptKind::Room => index.and_then(|i| self.rooms.get(i).cloned().flatten()),
            ScriptKind::Tile => index.and_then(|i| self.tiles.get(i).cloned().flatten()),
        };
        known.unwrap_or_else(|| {
            ctx.diagnose(format!("unknown script, type {}, id {}", kind.code(), id), ISSUER);
            format!("__UNKNOWN_SCRIPT_{}_{}", kind.code(), id)
        })
    }

    /// Register the script owned by `(kind, id)`.
    pub fn register(&mut self, kind: ScriptKind, id: i64, ctx: &mut TranspileContext) -> ScriptEntry {
        let mut name = self.base_name(kind, id, ctx);
        while self.taken.contains(&name) {
            name = format!("_{}_{}_{}", kind.code(), id, name);
        }
        self.taken.insert(name.clone());

        let slot = format!("__script[{}]", self.next_slot);
        self.next_slot += 1;
        ScriptEntry { name, kind, id, slot }
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

/// Runtime registration emitted ahead of a script's handlers.
pub fn script_header(entry: &ScriptEntry) -> String {
    let name = quote(&entry.name);
    format!(
        "\n----------------- {} ----------------------------\n\n\
         __pulp:newScript({})\n\
         {} = __pulp:getScript({})\n\
         __pulp:associateScript({}, \"{}\", {})\n",
        entry.name, name, entry.slot, name, name, entry.kind, entry.id
    )
}

/// Compile a whole script: the header, then every handler in order.
///
/// All event names are recorded as known handlers before any body is
/// compiled, so self-calls to a later handler resolve statically.
pub fn compile_script(
    entry: &ScriptEntry,
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    log::debug!(
        "compiling script '{}' ({} {}) with {} handlers",
        entry.name,
        entry.kind,
        entry.id,
        src.handlers.len()
    );
    let mut out = script_header(entry);

    ctx.known_handler_names = src.event_names().map(str::to_string).collect();
    for handler in &src.handlers {
        out.push('\n');
        out.push_str(&compile_handler(src, &entry.name, &entry.slot, handler, ctx)?);
    }
    ctx.known_handler_names.clear();
    Ok(out)
}

/// Compile every script of a game export in table order.
///
/// Entries that are not objects are skipped with a warning; a script with
/// an unrecognised type code is reported and skipped.
pub fn compile_export(export: &Value, ctx: &mut TranspileContext) -> CompileResult<String> {
    let mut registry = ScriptRegistry::from_json(export);
    let mut out = String::new();

    let Some(Value::Array(scripts)) = export.get("scripts") else {
        log::warn!("export has no script table");
        return Ok(out);
    };

    for (i, script) in scripts.iter().enumerate() {
        if !script.is_object() {
            log::warn!("peculiar entry {} in script table, expected an object", i);
            continue;
        }
        let id = script.get("id").and_then(Value::as_i64).unwrap_or(0);
        let code = script.get("type").and_then(Value::as_i64).unwrap_or(-1);
        let Some(kind) = ScriptKind::from_code(code) else {
            ctx.diagnose(format!("unknown script type {} for script {}", code, id), ISSUER);
            continue;
        };

        let entry = registry.register(kind, id, ctx);
        let src = match script.get("data") {
            Some(data) => ScriptSource::from_json(&entry.name, data)?,
            None => ScriptSource::new(&entry.name, Vec::new(), Vec::new()),
        };
        out.push_str(&compile_script(&entry, &src, ctx)?);
    }
    Ok(out)
}
