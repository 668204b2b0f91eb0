use crate::error::{Level, PulpluaErrorExt};
use crate::location::Location;

/// Raised when the exported tree breaks a shape the back end relies on.
#[derive(Debug, Clone)]
pub struct DecodeError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl DecodeError {
    pub fn new(message: String, issuer: &str) -> Self {
        DecodeError {
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

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for DecodeError {}

impl PulpluaErrorExt for DecodeError {
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
