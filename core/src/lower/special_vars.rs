//! file: core/src/lower/special_vars.rs
//! description: pseudo-variables with fixed Lua spellings.
//!
//! `event.*` position fields are computed once per generated function
//! and read through a local; calendar fields go through `__getTime()`;
//! engine-extension settings live on `__pulp`.
use std::collections::HashMap;

use lazy_static::lazy_static;

use super::context::TranspileContext;

#[derive(Debug, Clone, Copy)]
struct Remap {
    expr: &'static str,
    /// Local declaration the expression depends on, if any.
    binding: Option<&'static str>,
}

const fn plain(expr: &'static str) -> Remap {
    Remap { expr, binding: None }
}

const fn cached(expr: &'static str, binding: &'static str) -> Remap {
    Remap { expr, binding: Some(binding) }
}

lazy_static! {
    static ref SPECIAL_VARS: HashMap<&'static str, Remap> = {
        let mut m = HashMap::new();
        m.insert("event.px", cached("__event_px", "local __event_px = __pulp.player.x"));
        m.insert("event.py", cached("__event_py", "local __event_py = __pulp.player.y"));
        m.insert("event.x", cached("__event_x", "local __event_x = __actor.x or __pulp.player.x"));
        m.insert("event.y", cached("__event_y", "local __event_y = __actor.y or __pulp.player.y"));
        m.insert("event.dx", cached("__event_dx", "local __event_dx = event.dx or 0"));
        m.insert("event.dy", cached("__event_dy", "local __event_dy = event.dy or 0"));
        m.insert("event.tile", cached("__event_tile", "local __event_tile = __actor.name or 0"));
        m.insert("event.room", plain("event.room.name"));
        m.insert("event.player", plain("__pulp.player.name"));

        m.insert("datetime.year", plain("__getTime().year"));
        m.insert("datetime.year99", plain("--[[(year99)]] (__getTime().year % 100)"));
        m.insert("datetime.month", plain("__getTime().month"));
        m.insert("datetime.day", plain("__getTime().day"));
        m.insert("datetime.weekday", plain("(__getTime().weekday - 1)"));
        m.insert("datetime.hour", plain("__getTime().hour"));
        m.insert("datetime.hour12", plain("--[[(hour12)]] ((__getTime().hour % 12) + 1)"));
        m.insert("datetime.minute", plain("__getTime().minute"));
        m.insert("datetime.second", plain("__getTime().second"));
        m.insert("datetime.millisecond", plain("__getTime().millisecond --[[(PTL-only?)]]"));
        m.insert(
            "datetime.ampm",
            plain("--[[(ampm)]] (__getTime().hour < 12 and \"am\" or \"pm\")"),
        );
        m.insert(
            "datetime.AMPM",
            plain("--[[(AMPM)]] (__getTime().hour < 12 and \"AM\" or \"PM\")  --[[(PTL-only?)]]"),
        );
        m.insert("datetime.timestamp", plain("__getSecondsSinceEpoch()"));

        m.insert("__PTLE_SMOOTH_MOVEMENT_SPEED", plain("__pulp.PTLE_SMOOTH_MOVEMENT_SPEED"));
        m.insert("__PTLE_SMOOTH_OFFSET_X", plain("__pulp.PTLE_SMOOTH_OFFSET_X"));
        m.insert("__PTLE_SMOOTH_OFFSET_Y", plain("__pulp.PTLE_SMOOTH_OFFSET_Y"));
        m.insert("__PTLE_CONFIRM_DAS", plain("__pulp.PTLE_CONFIRM_DAS"));
        m.insert("__PTLE_CANCEL_DAS", plain("__pulp.PTLE_CANCEL_DAS"));
        m.insert("__PTLE_V_DAS", plain("__pulp.PTLE_V_DAS"));
        m.insert("__PTLE_H_DAS", plain("__pulp.PTLE_H_DAS"));
        m
    };
}

/// Map a (registered) variable name to the expression that reads it.
/// Unrecognised names come back unchanged.
pub fn remap(name: &str, ctx: &mut TranspileContext) -> String {
    match SPECIAL_VARS.get(name) {
        Some(entry) => {
            if let Some(binding) = entry.binding {
                ctx.cache_binding(binding);
            }
            entry.expr.to_string()
        }
        None => name.to_string(),
    }
}

pub fn is_special(name: &str) -> bool {
    SPECIAL_VARS.contains_key(name)
}
