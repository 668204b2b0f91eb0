//! file: core/src/error.rs
//! description: shared error surface for decoding and lowering.
//!
//! Fatal problems travel as `Box<dyn PulpluaErrorExt>` through `Result`;
//! soft problems are recorded as `Diagnostic` values on the transpile
//! context so a single run can report every one of them.
use std::fmt;

use serde::Serialize;

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

pub trait PulpluaErrorExt {
    fn level(&self) -> Level;
    fn message(&self) -> String;
    fn issuer(&self) -> String;
    fn location(&self) -> Option<Location>;
}

impl fmt::Debug for dyn PulpluaErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => loc.to_string(),
            None => "unknown".to_string(),
        };

        write!(
            f,
            "PULPLUA | {} | {} | {} | {}",
            self.level(),
            loc_str,
            self.issuer(),
            self.message()
        )
    }
}

impl fmt::Display for dyn PulpluaErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Result type used by every fallible compile step.
pub type CompileResult<T> = Result<T, Box<dyn PulpluaErrorExt>>;

/// A soft error. Compilation continues after one is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub issuer: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(level: Level, message: String, issuer: &str, location: Option<Location>) -> Self {
        Diagnostic {
            level,
            message,
            issuer: issuer.to_string(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} | {} | {}", self.level, loc, self.message),
            None => write!(f, "{} | {}", self.level, self.message),
        }
    }
}
