//! file: core/src/lower/naming.rs
//! description: identifier sanitisation and variable bookkeeping.
use super::context::TranspileContext;

/// Prefix of engine-extension settings exposed as pseudo-variables.
pub const EXTENSION_PREFIX: &str = "__PTLE_";

/// Prefix reserved for names synthesised by the compiler.
pub const RESERVED_PREFIX: &str = "__";

const LUA_KEYWORDS: [&str; 22] = [
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// `[A-Za-z_][A-Za-z0-9_]*`, excluding Lua keywords.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !LUA_KEYWORDS.contains(&name)
}

/// Looser than an identifier: `.` is allowed, so `event.x` is a token.
pub fn is_token(s: &str) -> bool {
    match s.chars().next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some(_) => !s.contains(' ') && !s.contains('-'),
    }
}

/// Backslash-escape text for a double-quoted Lua string.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Identifiers pass through; anything else becomes a `_G["..."]` lookup.
pub fn sanitize(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("_G[{}]", quote(name))
    }
}

/// Dotted names are field accesses and `__PTLE_` names are extension
/// settings; neither is a user variable.
pub fn is_passthrough(name: &str) -> bool {
    name.contains('.') || name.starts_with(EXTENSION_PREFIX)
}

/// The Lua text a user variable compiles to, without bookkeeping.
pub fn variable_identifier(name: &str) -> String {
    if name.starts_with(RESERVED_PREFIX) {
        sanitize(&format!("_{}", name))
    } else {
        sanitize(name)
    }
}

/// Record a use of `name` and return the identifier to emit for it.
pub fn register_use(name: &str, ctx: &mut TranspileContext) -> String {
    if is_passthrough(name) {
        return name.to_string();
    }
    *ctx.usage_counts.entry(name.to_string()).or_insert(0) += 1;
    let ident = variable_identifier(name);
    ctx.known_variables.insert(ident.clone());
    ident
}
