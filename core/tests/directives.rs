use pulplua_core::ast::{Directive, Namespace, parse_directive};
use pulplua_core::ast::Command;
use pulplua_core::lower::{SELF_OBJECT, collect_call_tags, compile_block};
use pulplua_core::{ExtValue, ExtensionConfig, ScriptSource, TileTable, TranspileContext};
use serde_json::{Value, json};

fn compile_comments(comments: Value, blocks: Value) -> (String, TranspileContext) {
    let src = ScriptSource::from_json(
        "game",
        &json!({ "__blocks": blocks, "__comments": comments }),
    )
    .expect("failed to decode");
    let mut ctx = TranspileContext::new(TileTable::new());
    let out = ctx
        .with_dispatch_object(SELF_OBJECT, |ctx| compile_block(&src, 0, ctx, true))
        .expect("failed to compile");
    (out, ctx)
}

#[test]
fn classifies_directive_text() {
    assert_eq!(parse_directive("[LUA] print(1)"), Directive::RawLua("print(1)"));
    assert_eq!(parse_directive("[LUA]x = 2"), Directive::RawLua("x = 2"));
    assert_eq!(
        parse_directive("[PDXINFO] author = Me"),
        Directive::Setting { namespace: Namespace::PdxInfo, key: "author", value: Some("Me") }
    );
    assert_eq!(
        parse_directive("[PTL] showFPS"),
        Directive::Setting { namespace: Namespace::Ptl, key: "showFPS", value: None }
    );
    assert_eq!(parse_directive("[DIRECT]"), Directive::Direct);
    assert_eq!(parse_directive("[SCRIPT:door]"), Directive::Script("door"));
    assert_eq!(parse_directive("[DIRECT] now"), Directive::Tag("[DIRECT] now"));
    assert_eq!(parse_directive("[TODO] later"), Directive::Tag("[TODO] later"));
    assert_eq!(parse_directive("plain words"), Directive::Text);
    assert!(Directive::Direct.is_call_tag());
    assert!(!Directive::Text.is_call_tag());
}

#[test]
fn comments_lower_to_lua_comments() {
    let (out, ctx) = compile_comments(
        json!(["hello", "trailing", "line1\nline2", "[TODO] later"]),
        json!([[["#", 0], ["#$", 1], ["#", 2], ["#", 3], ["#", 9]]]),
    );
    assert_eq!(
        out,
        "  --hello\n  --^trailing\n  --[[line1\nline2]]\n  --[TODO] later\n  --<comment missing>\n"
    );
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn long_comment_brackets_avoid_the_text() {
    let (out, _) = compile_comments(json!(["a]]\nb"]), json!([[["#$", 0]]]));
    assert_eq!(out, "  --[=[^a]]\nb]=]\n");
}

#[test]
fn raw_lua_is_emitted_verbatim() {
    let (out, _) = compile_comments(
        json!(["  [LUA] if x then y() end  "]),
        json!([[["#", 0], ["inc", "x"]]]),
    );
    assert_eq!(out, "  if x then y() end\n  x += 1\n");
}

#[test]
fn settings_fold_into_the_config() {
    let (out, ctx) = compile_comments(
        json!([
            "[PDXINFO] name = Pulp Game",
            "[PTL] showFPS = 1",
            "[PTL] legacySound = false",
            "[PTL] fullMimics = False"
        ]),
        json!([[["#", 0], ["#", 1], ["#", 2], ["#", 3]]]),
    );
    assert_eq!(out, "");
    let cfg = &ctx.extension_config;
    assert_eq!(cfg.pdxinfo.get("name").map(String::as_str), Some("Pulp Game"));
    assert_eq!(cfg.ptl.get("showFPS"), Some(&ExtValue::Text("1".into())));
    assert_eq!(cfg.ptl.get("legacySound"), Some(&ExtValue::Bool(false)));
    assert_eq!(cfg.ptl.get("fullMimics"), Some(&ExtValue::Bool(false)));
    assert!(cfg.ptl_enabled("showFPS"));
    assert!(!cfg.ptl_enabled("fullMimics"));
}

#[test]
fn malformed_setting_is_a_diagnostic() {
    let (out, ctx) = compile_comments(json!(["[PTL] oops"]), json!([[["#", 0]]]));
    assert_eq!(out, "");
    assert_eq!(ctx.diagnostics.len(), 1);
    assert!(ctx.diagnostics[0].message.contains("[PTL] oops"));
}

#[test]
fn config_defaults_are_off() {
    let cfg = ExtensionConfig::with_defaults();
    assert_eq!(cfg.ptl.get("legacySound"), Some(&ExtValue::Bool(false)));
    assert_eq!(cfg.ptl.get("showFPS"), Some(&ExtValue::Bool(false)));
    assert!(cfg.pdxinfo.is_empty());
    assert!(!cfg.ptl_enabled("missing"));

    assert_eq!(ExtValue::normalize("0"), ExtValue::Bool(false));
    assert_eq!(ExtValue::normalize("False"), ExtValue::Bool(false));
    assert_eq!(ExtValue::normalize("yes"), ExtValue::Text("yes".into()));
}

#[test]
fn call_tags_are_never_printed() {
    let (out, _) = compile_comments(
        json!(["[DIRECT]", "[SCRIPT:door]"]),
        json!([[["#", 0], ["#", 1]]]),
    );
    assert_eq!(out, "");
}

#[test]
fn call_tags_stop_at_the_first_command() {
    let src = ScriptSource::from_json(
        "game",
        &json!({ "__comments": ["[SCRIPT:door]", "note", "[DIRECT]"] }),
    )
    .expect("failed to decode");
    let following = vec![
        Command::Comment { index: 0, inline: true },
        Command::Comment { index: 1, inline: false },
        Command::Blank,
        Command::Comment { index: 2, inline: false },
    ];
    let tags = collect_call_tags(&following, &src);
    assert!(!tags.direct);
    assert_eq!(tags.scripts, vec![("door", "[SCRIPT:door]")]);
    assert!(collect_call_tags(&following[2..], &src).is_empty());
}

#[test]
fn bracket_openers_stay_line_comments() {
    let (out, _) = compile_comments(
        json!(["[[ note", "[==[ wide", "[x] fine"]),
        json!([[["#", 0], ["set", "x", 1], ["#", 1], ["#", 2], ["#$", 0]]]),
    );
    assert_eq!(
        out,
        "  --[[[[ note]]\n  x = 1\n  --[[[==[ wide]]\n  --[x] fine\n  --^[[ note\n"
    );
}
