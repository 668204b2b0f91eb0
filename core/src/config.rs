//! file: core/src/config.rs
//! description: extension configuration collected from directive comments.
//!
//! `[PDXINFO] key = value` fills the launcher metadata namespace and
//! `[PTL] key = value` fills the engine-extension namespace. The driver
//! reads both after compilation.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::Namespace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtValue {
    Bool(bool),
    Text(String),
}

impl ExtValue {
    /// `0`, `False` and `false` read as boolean false; everything else is text.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "0" | "False" | "false" => ExtValue::Bool(false),
            other => ExtValue::Text(other.to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            ExtValue::Bool(b) => *b,
            ExtValue::Text(s) => !s.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtensionConfig {
    pub pdxinfo: BTreeMap<String, String>,
    pub ptl: BTreeMap<String, ExtValue>,
}

impl ExtensionConfig {
    pub fn new() -> Self {
        ExtensionConfig::default()
    }

    /// Engine-extension switches default to off.
    pub fn with_defaults() -> Self {
        let mut cfg = ExtensionConfig::new();
        cfg.ptl.insert("legacySound".to_string(), ExtValue::Bool(false));
        cfg.ptl.insert("showFPS".to_string(), ExtValue::Bool(false));
        cfg
    }

    pub fn set(&mut self, namespace: Namespace, key: &str, value: &str) {
        match namespace {
            Namespace::PdxInfo => {
                self.pdxinfo.insert(key.to_string(), value.to_string());
            }
            Namespace::Ptl => {
                self.ptl.insert(key.to_string(), ExtValue::normalize(value));
            }
        }
    }

    pub fn ptl_enabled(&self, key: &str) -> bool {
        self.ptl.get(key).map(|v| v.is_enabled()).unwrap_or(false)
    }
}
