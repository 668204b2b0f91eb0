use crate::error::{Level, PulpluaErrorExt};
use crate::location::Location;

/// Raised when lowering meets a tree that breaks a back-end invariant,
/// such as a block index outside the block table. Aborts the run.
#[derive(Debug, Clone)]
pub struct StructuralError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl StructuralError {
    pub fn new(message: String, issuer: &str) -> Self {
        StructuralError {
            level: Level::Critical,
            message,
            issuer: issuer.to_string(),
            location: None,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn boxed(self) -> Box<dyn PulpluaErrorExt> {
        Box::new(self)
    }
}

impl std::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for StructuralError {}

impl PulpluaErrorExt for StructuralError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
