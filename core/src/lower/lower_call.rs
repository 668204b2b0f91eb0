//! file: core/src/lower/lower_call.rs
//! description: built-in function call resolution.
//!
//! Operands are first sorted into named slots (`x`, `y`, `w`, `h`,
//! `block`, plus the ambient `actor`/`event`/`evname`) and positional
//! values. Operations with a declared slot order get those slots
//! prepended, padded with `nil`. The call is then emitted by the first
//! matching tier:
//!
//! 1. an inline template keyed by `prefix + op`,
//! 2. a statically bound helper keyed by `op`,
//! 3. `__pulp.<prefix><op>(...)`.
use std::collections::HashMap;

use lazy_static::lazy_static;

use super::context::TranspileContext;
use super::lower_expr::lower_expr;
use crate::ast::{Arg, Expr, ScriptSource};
use crate::error::CompileResult;

/// Member-name prefix of the runtime call namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPrefix {
    Statement,
    Expression,
}

impl CallPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallPrefix::Statement => "__fn_",
            CallPrefix::Expression => "__ex_",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Actor,
    Event,
    EvName,
    Block,
    X,
    Y,
    W,
    H,
    Len,
    Lines,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(&'static str),
    Arg(usize),
}

/// Split `{n}` placeholders out of a template once.
fn parse_template(template: &'static str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        match rest[open + 1..close].parse::<usize>() {
            Ok(idx) => {
                if open > 0 {
                    segments.push(Segment::Text(&rest[..open]));
                }
                segments.push(Segment::Arg(idx));
            }
            Err(_) => segments.push(Segment::Text(&rest[..=close])),
        }
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    segments
}

lazy_static! {
    static ref SLOT_ORDERS: HashMap<&'static str, Vec<Slot>> = {
        use Slot::*;
        let mut m = HashMap::new();
        m.insert("frame", vec![Actor]);
        m.insert("goto", vec![X, Y]);
        m.insert("tell", vec![Event, EvName, Block]);
        m.insert("swap", vec![Actor]);
        m.insert("label", vec![X, Y, Len, Lines]);
        m.insert("draw", vec![X, Y]);
        m.insert("solid", vec![X, Y]);
        m.insert("wait", vec![Actor, Event, EvName, Block]);
        m.insert("say", vec![X, Y, W, H, Actor, Event, EvName, Block]);
        m.insert("ask", vec![X, Y, W, H, Actor, Event, EvName, Block]);
        m.insert("menu", vec![X, Y, W, H, Actor, Event, EvName, Block]);
        m.insert("option", vec![Actor, Event, EvName, Block]);
        m.insert("window", vec![X, Y, W, H]);
        m.insert("fill", vec![X, Y, W, H]);
        m.insert("crop", vec![X, Y, W, H]);
        m.insert("play", vec![Actor, Event, EvName, Block]);
        m.insert("once", vec![Actor, Event, EvName, Block]);
        m.insert("type", vec![X, Y]);
        m.insert("id", vec![X, Y]);
        m
    };

    static ref INLINE_TEMPLATES: HashMap<&'static str, Vec<Segment>> = {
        let raw: [(&'static str, &'static str); 9] = [
            ("__fn_frame", "{0}.frame = {1}"),
            ("__fn_inc", "{0} += 1"),
            ("__fn_dec", "{0} -= 1"),
            ("__fn_log", "__print({0})"),
            (
                "__fn_fill",
                "__setcolour(__fillcolours[{4}]); __fillrect({0} * __pix8scale, {1} * __pix8scale, {2} * __pix8scale, {3} * __pix8scale)",
            ),
            ("__ex_frame", "({0}.frame or 0)"),
            ("__ex_invert", "(__pulp.invert and 1 or 0)"),
            ("__ex_degrees", "({0} * 360 / __tau)"),
            ("__ex_radians", "({0} * __tau / 360)"),
        ];
        raw.into_iter().map(|(k, t)| (k, parse_template(t))).collect()
    };

    static ref STATIC_BINDINGS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("floor", "__floor");
        m.insert("ceil", "__ceil");
        m.insert("round", "__round");
        m.insert("sine", "__sin");
        m.insert("cosine", "__cos");
        m.insert("tangent", "__tan");
        m.insert("random", "__random");
        m
    };
}

/// Named slot values for one call site.
struct SlotValues {
    actor: String,
    event: String,
    evname: String,
    block: Option<String>,
    x: Option<String>,
    y: Option<String>,
    w: Option<String>,
    h: Option<String>,
}

impl SlotValues {
    fn new() -> Self {
        SlotValues {
            actor: "__actor".to_string(),
            event: "event".to_string(),
            evname: "__evname".to_string(),
            block: None,
            x: None,
            y: None,
            w: None,
            h: None,
        }
    }

    fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Actor => Some(&self.actor),
            Slot::Event => Some(&self.event),
            Slot::EvName => Some(&self.evname),
            Slot::Block => self.block.as_deref(),
            Slot::X => self.x.as_deref(),
            Slot::Y => self.y.as_deref(),
            Slot::W => self.w.as_deref(),
            Slot::H => self.h.as_deref(),
            Slot::Len | Slot::Lines => None,
        }
    }
}

/// Lower the operands of a call to the final argument list.
fn lower_arguments(
    op: &str,
    args: &[Arg],
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<Vec<String>> {
    let mut slots = SlotValues::new();
    let mut positional = Vec::new();

    for arg in args {
        match arg {
            Arg::Xy(x, y) => {
                slots.x = Some(lower_expr(x, src, ctx)?);
                slots.y = Some(lower_expr(y, src, ctx)?);
            }
            Arg::Rect { x, y, w, h } => {
                slots.x = Some(lower_expr(x, src, ctx)?);
                slots.y = Some(lower_expr(y, src, ctx)?);
                slots.w = Some(lower_expr(w, src, ctx)?);
                if let Some(h) = h {
                    slots.h = Some(lower_expr(h, src, ctx)?);
                }
            }
            Arg::Value(block @ Expr::Block(_)) => {
                slots.block = Some(lower_expr(block, src, ctx)?);
            }
            Arg::Value(expr) => positional.push(lower_expr(expr, src, ctx)?),
        }
    }

    let Some(order) = SLOT_ORDERS.get(op) else {
        return Ok(positional);
    };
    let mut out: Vec<String> = order
        .iter()
        .map(|slot| slots.get(*slot).unwrap_or("nil").to_string())
        .collect();
    out.append(&mut positional);
    Ok(out)
}

fn expand_template(segments: &[Segment], args: &[String]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Arg(idx) => out.push_str(args.get(*idx).map(|a| a.as_str()).unwrap_or("nil")),
        }
    }
    out
}

/// Lower a built-in call `op` with the given operands.
pub fn resolve_call(
    op: &str,
    prefix: CallPrefix,
    args: &[Arg],
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    let lowered = lower_arguments(op, args, src, ctx)?;
    let member = format!("{}{}", prefix.as_str(), op);

    if let Some(segments) = INLINE_TEMPLATES.get(member.as_str()) {
        return Ok(expand_template(segments, &lowered));
    }
    let callee = match STATIC_BINDINGS.get(op) {
        Some(bound) => bound.to_string(),
        None => format!("__pulp.{}", member),
    };
    Ok(format!("{}({})", callee, lowered.join(", ")))
}

/// Whether `prefix + op` expands inline rather than emitting a call.
pub fn is_inlined(op: &str, prefix: CallPrefix) -> bool {
    INLINE_TEMPLATES.contains_key(format!("{}{}", prefix.as_str(), op).as_str())
}

