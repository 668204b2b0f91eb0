//! file: core/src/lower/context.rs
//! description: mutable state threaded through every lowering routine.
//!
//! `TranspileContext` lives for one compilation run. Its stack-shaped
//! parts (cache frames, dispatch objects, indentation) are only changed
//! through the `with_*`/`indented` helpers, which restore the previous
//! depth when the closure returns, error or not.
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::ExtensionConfig;
use crate::error::{CompileResult, Diagnostic, Level};
use crate::location::Location;
use crate::opt::{DelegationRecord, ScriptTag, TileTable};
use crate::reports::CompileReport;

/// Dispatch object of a top-level handler; aliased to the concrete
/// script table by a cached `local __self = ...`.
pub const SELF_OBJECT: &str = "__self";

#[derive(Debug, Clone)]
pub struct TranspileContext {
    pub indent: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Sanitised identifiers of every user variable seen so far.
    pub known_variables: BTreeSet<String>,
    /// Raw variable name -> number of references.
    pub usage_counts: BTreeMap<String, usize>,
    cache_frames: Vec<BTreeSet<String>>,
    dispatch_objects: Vec<String>,
    pub root_dispatch_object: String,
    pub known_handler_names: HashSet<String>,
    pub extension_config: ExtensionConfig,
    /// Synthesised identifier -> routed (script, handler) pair.
    pub script_tags: BTreeMap<String, ScriptTag>,
    pub full_delegation_records: Vec<DelegationRecord>,
    pub tiles: TileTable,
    cursor: Option<Location>,
}

impl Default for TranspileContext {
    fn default() -> Self {
        TranspileContext::new(TileTable::new())
    }
}

impl TranspileContext {
    pub fn new(tiles: TileTable) -> Self {
        TranspileContext {
            indent: 1,
            diagnostics: Vec::new(),
            known_variables: BTreeSet::new(),
            usage_counts: BTreeMap::new(),
            cache_frames: Vec::new(),
            dispatch_objects: Vec::new(),
            root_dispatch_object: String::new(),
            known_handler_names: HashSet::new(),
            extension_config: ExtensionConfig::with_defaults(),
            script_tags: BTreeMap::new(),
            full_delegation_records: Vec::new(),
            tiles,
            cursor: None,
        }
    }

    /// Current indentation as text, two spaces per level.
    pub fn gi(&self) -> String {
        "  ".repeat(self.indent)
    }

    // ------- Indentation -------

    pub fn indented<T>(&mut self, levels: usize, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent += levels;
        let out = f(self);
        self.indent -= levels;
        out
    }

    // ------- Cache frames -------

    /// Run `f` inside a fresh cache frame. Returns its result together with
    /// the frame's bindings, sorted.
    pub fn with_cache_frame<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> CompileResult<T>,
    ) -> CompileResult<(T, Vec<String>)> {
        self.cache_frames.push(BTreeSet::new());
        let out = f(self);
        let frame = self.cache_frames.pop().unwrap_or_default();
        out.map(|v| (v, frame.into_iter().collect()))
    }

    /// Add a once-per-function binding to the innermost frame.
    pub fn cache_binding(&mut self, stmt: &str) {
        match self.cache_frames.last_mut() {
            Some(frame) => {
                if frame.insert(stmt.to_string()) {
                    log::trace!("cached binding: {}", stmt);
                }
            }
            None => log::warn!("binding '{}' requested outside any function scope", stmt),
        }
    }

    pub fn cache_depth(&self) -> usize {
        self.cache_frames.len()
    }

    // ------- Dispatch objects -------

    pub fn with_dispatch_object<T>(&mut self, object: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.dispatch_objects.push(object.to_string());
        let out = f(self);
        self.dispatch_objects.pop();
        out
    }

    /// Object a bare call currently dispatches against.
    pub fn dispatch_object(&self) -> &str {
        self.dispatch_objects
            .last()
            .map(|s| s.as_str())
            .unwrap_or(SELF_OBJECT)
    }

    pub fn dispatch_depth(&self) -> usize {
        self.dispatch_objects.len()
    }

    // ------- Diagnostics -------

    pub(crate) fn set_cursor(&mut self, cursor: Option<Location>) -> Option<Location> {
        std::mem::replace(&mut self.cursor, cursor)
    }

    pub fn cursor(&self) -> Option<&Location> {
        self.cursor.as_ref()
    }

    pub fn diagnose(&mut self, message: String, issuer: &str) {
        log::warn!("{}", message);
        let location = self.cursor.clone();
        self.diagnostics
            .push(Diagnostic::new(Level::Error, message, issuer, location));
    }

    /// Snapshot of the side tables the driver consumes.
    pub fn report(&self) -> CompileReport {
        CompileReport {
            diagnostics: self.diagnostics.clone(),
            extension_config: self.extension_config.clone(),
            script_tags: self.script_tags.clone(),
            full_delegation_records: self.full_delegation_records.clone(),
        }
    }
}
