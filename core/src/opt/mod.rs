//! Source-level optimizations applied while lowering: tile-name folding,
//! single-delegation collapse and tag-driven call routing.
pub mod delegation;
pub mod script_tags;
pub mod tile_ids;

pub use delegation::{DelegationRecord, single_delegation_target};
pub use script_tags::{ScriptTag, register_script_tag};
pub use tile_ids::{TileTable, resolve_tile_arg, resolve_tile_ref};
