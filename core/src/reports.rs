// Side tables produced by a compilation run.
// The driver reads these after compiling every script: diagnostics to
// print, extension settings for the launcher metadata, script tags and
// delegation records for the dispatch glue.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::config::ExtensionConfig;
use crate::error::{Diagnostic, Level};
use crate::opt::{DelegationRecord, ScriptTag};

/// Everything a run hands back besides the generated Lua.
///
/// # Examples
/// ```
/// use pulplua_core::{TileTable, TranspileContext};
///
/// let ctx = TranspileContext::new(TileTable::new());
/// let report = ctx.report();
/// assert!(report.is_clean());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileReport {
    pub diagnostics: Vec<Diagnostic>,
    pub extension_config: ExtensionConfig,
    pub script_tags: BTreeMap<String, ScriptTag>,
    pub full_delegation_records: Vec<DelegationRecord>,
}

impl CompileReport {
    /// No diagnostics were recorded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// Diagnostic messages with duplicates removed, first occurrence kept.
    pub fn unique_messages(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .filter(|m| seen.insert(*m))
            .collect()
    }

    // convenience conversion to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    // compact overview for driver logs
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "diagnostics": self.diagnostics.len(),
            "errors": self.count_at(Level::Error),
            "script_tags": self.script_tags.len(),
            "delegations": self.full_delegation_records.len(),
            "pdxinfo": self.extension_config.pdxinfo,
            "ptl": self.extension_config.ptl,
        })
    }
}
