//! file: core/src/ast/mod.rs
//! description: typed input tree and its decoders.
//!
//! The front end exports scripts as JSON. This module turns that export
//! into `Command`/`Expr` sum types and per-script block tables, and
//! classifies directive comments.
pub mod err;
pub mod expr;
pub mod kind;
pub mod node;
pub mod rules;
pub mod stmt;

pub use err::DecodeError;
pub use kind::{
    Arg, AssignOp, Branch, CallTarget, Command, CompareOp, Condition, Expr, ExprFunc, StmtFunc,
};
pub use node::{Block, Handler, ScriptSource};
pub use rules::{Directive, Namespace, parse_directive};
