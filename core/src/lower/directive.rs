//! file: core/src/lower/directive.rs
//! description: comment lowering and call-site tag collection.
//!
//! A comment either becomes a Lua comment, raw Lua (`[LUA]`), an
//! extension setting folded into the context, or a call tag that the
//! preceding call consumes. Settings and call tags produce no output.
use super::context::TranspileContext;
use crate::ast::{Command, Directive, ScriptSource, parse_directive};

const ISSUER: &str = "pulplua.lower.directive";

/// Tags attached to a command by the comments that directly follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallTags<'a> {
    pub direct: bool,
    /// `(script name, tag text)` per `[SCRIPT:...]`, in source order.
    pub scripts: Vec<(&'a str, &'a str)>,
}

impl CallTags<'_> {
    pub fn is_empty(&self) -> bool {
        !self.direct && self.scripts.is_empty()
    }
}

/// Collect call tags from the run of comment commands at the start of
/// `following`. The first non-comment ends the run.
pub fn collect_call_tags<'a>(following: &[Command], src: &'a ScriptSource) -> CallTags<'a> {
    let mut tags = CallTags::default();
    for cmd in following {
        let Command::Comment { index, .. } = cmd else {
            break;
        };
        let Some(text) = src.comment(*index).map(str::trim) else {
            continue;
        };
        if !text.starts_with('[') {
            continue;
        }
        match parse_directive(text) {
            Directive::Direct => tags.direct = true,
            Directive::Script(name) => tags.scripts.push((name, text)),
            _ => {}
        }
    }
    tags
}

/// Pick long brackets that `text` cannot close early.
fn long_brackets(text: &str) -> (String, String) {
    let mut level = 0;
    loop {
        let close = format!("]{}]", "=".repeat(level));
        let probe = format!("{}{}", text, close);
        if probe.find(&close) == Some(text.len()) {
            return (format!("[{}[", "=".repeat(level)), close);
        }
        level += 1;
    }
}

/// `[[`, `[=[`, ... right after `--` would open a long comment.
fn opens_long_bracket(text: &str) -> bool {
    text.strip_prefix('[')
        .map(|rest| rest.trim_start_matches('=').starts_with('['))
        .unwrap_or(false)
}

fn lua_comment(text: &str, inline: bool) -> String {
    let marker = if inline { "^" } else { "" };
    if text.contains('\n') || (!inline && opens_long_bracket(text)) {
        let (open, close) = long_brackets(text);
        format!("--{}{}{}{}", open, marker, text, close)
    } else {
        format!("--{}{}", marker, text)
    }
}

/// Lower one comment command. `None` means nothing is emitted.
pub fn compile_comment(
    index: usize,
    inline: bool,
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> Option<String> {
    let Some(text) = src.comment(index) else {
        return Some(lua_comment("<comment missing>", inline));
    };

    let trimmed = text.trim();
    if !trimmed.starts_with('[') {
        return Some(lua_comment(text, inline));
    }

    match parse_directive(trimmed) {
        Directive::RawLua(code) => Some(code.to_string()),
        Directive::Setting { namespace, key, value } => {
            match value {
                Some(value) if !key.is_empty() => {
                    log::debug!("extension setting {:?} {} = {}", namespace, key, value);
                    ctx.extension_config.set(namespace, key, value);
                }
                _ => ctx.diagnose(format!("malformed setting directive: {}", trimmed), ISSUER),
            }
            None
        }
        d if d.is_call_tag() => None,
        _ => Some(lua_comment(text, inline)),
    }
}
