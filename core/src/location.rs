use serde::Serialize;

/// Position of a command inside a script's block table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize)]
pub struct Location {
    /// The script that owns the block.
    pub script: String,
    /// Index into the script's block table.
    pub block: usize,
    /// Index of the command within the block.
    pub command: usize,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(script: String, block: usize, command: usize) -> Self {
        Self { script, block, command }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.script, self.block, self.command)
    }
}
