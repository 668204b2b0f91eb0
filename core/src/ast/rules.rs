//! file: core/src/ast/rules.rs
//! description: pest-backed classification of directive comments.
//!
//! Comment text can carry raw Lua, extension settings, or call-site tags.
//! `parse_directive` classifies the (trimmed) text; anything that does
//! not start with `[` is an ordinary comment.
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "directive.pest"]
pub struct DirectiveParser;

/// The two extension-setting namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    PdxInfo,
    Ptl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `[LUA] code`, emitted verbatim.
    RawLua(&'a str),
    /// `[PDXINFO] key = value` / `[PTL] key = value`. `value` is `None`
    /// when the `=` is missing.
    Setting { namespace: Namespace, key: &'a str, value: Option<&'a str> },
    /// `[DIRECT]`
    Direct,
    /// `[SCRIPT:name]`
    Script(&'a str),
    /// Any other bracketed annotation.
    Tag(&'a str),
    Text,
}

impl Directive<'_> {
    /// Call-site tags are consumed by call lowering and never printed.
    pub fn is_call_tag(&self) -> bool {
        matches!(self, Directive::Direct | Directive::Script(_))
    }
}

pub fn parse_directive(text: &str) -> Directive<'_> {
    let Ok(mut pairs) = DirectiveParser::parse(Rule::directive, text) else {
        return Directive::Text;
    };
    let Some(inner) = pairs.next().and_then(|d| d.into_inner().next()) else {
        return Directive::Text;
    };

    match inner.as_rule() {
        Rule::lua => {
            let code = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Directive::RawLua(code)
        }
        Rule::pdxinfo | Rule::ptl => {
            let namespace = if inner.as_rule() == Rule::pdxinfo {
                Namespace::PdxInfo
            } else {
                Namespace::Ptl
            };
            let mut key = "";
            let mut value = None;
            if let Some(setting) = inner.into_inner().next() {
                for part in setting.into_inner() {
                    match part.as_rule() {
                        Rule::key => key = part.as_str().trim(),
                        Rule::value => value = Some(part.as_str().trim()),
                        _ => {}
                    }
                }
            }
            Directive::Setting { namespace, key, value }
        }
        Rule::direct_tag => Directive::Direct,
        Rule::script_tag => {
            let name = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Directive::Script(name)
        }
        Rule::bracket_tag => Directive::Tag(inner.as_str()),
        _ => Directive::Text,
    }
}
