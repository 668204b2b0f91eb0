//! file: core/src/opt/script_tags.rs
//! description: `[SCRIPT:<name>]` call routing.
//!
//! A tagged call site is rewritten to call a synthesised global instead of
//! going through the dispatch object. The driver binds each global once to
//! the named script's handler, giving a precompiled dispatch target.
use serde::Serialize;

use crate::lower::context::TranspileContext;

pub const TAG_PREFIX: &str = "__OPTTAG__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptTag {
    /// Script named in the tag.
    pub source: String,
    /// Handler name called at the tagged site.
    pub call: String,
}

fn mangle(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Return the identifier routing calls of `call` to script `source`,
/// registering it on first use. Distinct pairs never share an identifier.
pub fn register_script_tag(ctx: &mut TranspileContext, source: &str, call: &str) -> String {
    let base = format!("{}{}", TAG_PREFIX, mangle(&format!("{}_{}", source, call)));
    let mut ident = base.clone();
    let mut n = 1;
    loop {
        match ctx.script_tags.get(&ident) {
            Some(tag) if tag.source == source && tag.call == call => return ident,
            Some(_) => {
                n += 1;
                ident = format!("{}_{}", base, n);
            }
            None => break,
        }
    }
    log::trace!("registered script tag {} -> {}.{}", ident, source, call);
    ctx.script_tags.insert(
        ident.clone(),
        ScriptTag { source: source.to_string(), call: call.to_string() },
    );
    ident
}
