//! file: core/src/lower/mod.rs
//! description: lowering of decoded scripts to Lua source.
//!
//! Everything here writes into a `TranspileContext`; `compile_handler` is
//! the entry point for a single event handler. See `crate::script` for
//! whole-script compilation.
pub mod context;
pub mod directive;
pub mod err;
pub mod lower_call;
pub mod lower_expr;
pub mod lower_stmt;
pub mod naming;
pub mod special_vars;

pub use context::{SELF_OBJECT, TranspileContext};
pub use directive::{CallTags, collect_call_tags, compile_comment};
pub use err::StructuralError;
pub use lower_call::{CallPrefix, resolve_call};
pub use lower_expr::lower_expr;
pub use lower_stmt::{compile_block, compile_command};
pub use naming::{register_use, sanitize};
pub use special_vars::remap;

use crate::ast::{Handler, ScriptSource};
use crate::error::CompileResult;
use crate::opt::{DelegationRecord, single_delegation_target};

/// Runtime expression for the script table named `owner`.
pub fn script_lookup(owner: &str) -> String {
    format!("__pulp:getScript({})", naming::quote(owner))
}

/// Compile one event handler of `src` into a function assigned on the
/// script table of `owner`.
///
/// `root` is the expression bare self-calls are bound to (the script's
/// registry slot). When empty, the `getScript` lookup is used instead.
/// `ctx.known_handler_names` must already list the script's events.
pub fn compile_handler(
    src: &ScriptSource,
    owner: &str,
    root: &str,
    handler: &Handler,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    log::debug!("compiling handler {}.{}", owner, handler.event);

    let table = script_lookup(owner);
    let mut out = if naming::is_identifier(&handler.event) {
        format!("{}.{} = function(__actor, event, __evname)\n", table, handler.event)
    } else {
        format!(
            "{}[{}] = function(__actor, event, __evname)\n",
            table,
            naming::quote(&handler.event)
        )
    };

    ctx.root_dispatch_object = if root.is_empty() { table.clone() } else { root.to_string() };
    let body = ctx.with_dispatch_object(SELF_OBJECT, |ctx| {
        compile_block(src, handler.block, ctx, true)
    })?;
    out.push_str(&body);
    out.push_str("end\n");

    if let Some((target_id, target_name)) =
        single_delegation_target(src.block(handler.block)?, &ctx.tiles)
    {
        log::debug!(
            "handler {}.{} delegates entirely to tile {} ({})",
            owner,
            handler.event,
            target_id,
            target_name
        );
        ctx.full_delegation_records.push(DelegationRecord {
            owner: owner.to_string(),
            event: handler.event.clone(),
            target_id,
            target_name,
        });
    }
    Ok(out)
}
