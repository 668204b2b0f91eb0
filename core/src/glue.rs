//! file: core/src/glue.rs
//! description: driver-facing Lua emitted from the context's side tables.
//!
//! None of this depends on a single handler. The driver calls these once
//! all scripts are compiled and places the output around the handlers.
use std::collections::BTreeMap;

use crate::lower::TranspileContext;
use crate::lower::naming::{RESERVED_PREFIX, is_identifier, quote, variable_identifier};
use crate::opt::DelegationRecord;

/// Upper bound on `local` declarations; Lua caps locals per function.
pub const MAX_LOCAL_VARIABLES: usize = 160;

/// Plain user variables, most used first. Ties are broken by name.
pub fn ranked_variables(ctx: &TranspileContext) -> Vec<String> {
    let mut usage: BTreeMap<String, usize> = BTreeMap::new();
    for (raw, count) in &ctx.usage_counts {
        let ident = variable_identifier(raw);
        if is_identifier(&ident) {
            *usage.entry(ident).or_insert(0) += count;
        }
    }
    let mut ranked: Vec<(String, usize)> = usage.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(name, _)| name).collect()
}

/// Declarations for every user variable, initialised to `0`.
pub fn variable_prologue(ctx: &TranspileContext) -> String {
    let mut out = String::new();
    for (i, var) in ranked_variables(ctx).iter().enumerate() {
        if i < MAX_LOCAL_VARIABLES {
            out.push_str("local ");
        }
        out.push_str(var);
        out.push_str(" = 0\n");
    }
    out
}

/// Runtime access to user variables by name.
///
/// Locals cannot be reached through `_G`, so each gets a setter and a
/// getter closure. Names are escaped with the same reserved-prefix rule
/// as the compiled code before lookup.
pub fn variable_accessors(ctx: &TranspileContext) -> String {
    let ranked = ranked_variables(ctx);
    let locals = &ranked[..ranked.len().min(MAX_LOCAL_VARIABLES)];
    let escape = format!(
        "  if varname:sub(1, {n}) == \"{p}\" then varname = \"_\" .. varname end\n",
        n = RESERVED_PREFIX.len(),
        p = RESERVED_PREFIX
    );

    let mut out = String::from("local __LOCVARSET = {\n");
    for var in locals {
        out.push_str(&format!("  [{}] = function(__{v}) {v} = __{v} end,\n", quote(var), v = var));
    }
    out.push_str("nil}\n");
    out.push_str("local __LOCVARGET = {\n");
    for var in locals {
        out.push_str(&format!("  [{}] = function() return {} end,\n", quote(var), var));
    }
    out.push_str("nil}\n");

    out.push_str("function __pulp.setvariable(varname, value)\n");
    out.push_str(&escape);
    out.push_str("  local __varsetter = __LOCVARSET[varname]\n");
    out.push_str("  if __varsetter then __varsetter(value) else _G[varname] = value end\n");
    out.push_str("end\n");

    out.push_str("function __pulp.getvariable(varname)\n");
    out.push_str(&escape);
    out.push_str("  local __vargetter = __LOCVARGET[varname]\n");
    out.push_str("  if __vargetter then return __vargetter() else return _G[varname] end\n");
    out.push_str("end\n");

    out.push_str("function __pulp.resetvars()\n");
    for var in &ctx.known_variables {
        out.push_str(&format!("  {} = 0\n", var));
    }
    out.push_str("end\n");
    out
}

/// One global per `[SCRIPT:...]` routing tag, bound to its handler.
pub fn script_tag_bindings(ctx: &TranspileContext) -> String {
    ctx.script_tags
        .iter()
        .map(|(ident, tag)| {
            format!(
                "{} = __pulp:getScript({})[{}]\n",
                ident,
                quote(&tag.source),
                quote(&tag.call)
            )
        })
        .collect()
}

/// Static dispatch table for handlers that only delegate to a tile.
/// Empty when there is nothing to collapse.
///
/// The loop runs a few times so chains of delegations settle.
pub fn delegation_table(records: &[DelegationRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n-- full mimics\nfor _=1,5 do\n");
    for record in records {
        let owner = format!("__pulp:getScript({})", quote(&record.owner));
        let target = format!("__pulp:getScript({})", quote(&record.target_name));
        if record.event != "any" {
            let event = quote(&record.event);
            out.push_str(&format!(
                "  {owner}[{event}] = {target}[{event}] or {target}.any\n"
            ));
        } else {
            out.push_str(&format!("  for name, fn in pairs({target}) do -- (for 'any')\n"));
            out.push_str(&format!(
                "    if not {owner}[name] and type(fn) == \"function\" then\n"
            ));
            out.push_str(&format!("      {owner}[name] = fn\n"));
            out.push_str("    end\n");
            out.push_str("  end\n");
        }
    }
    out.push_str("end\n");
    out
}
