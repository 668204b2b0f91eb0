use pulplua_core::lower::naming::{
    escape_string, is_identifier, is_token, quote, register_use, sanitize, variable_identifier,
};
use pulplua_core::lower::remap;
use pulplua_core::lower::special_vars::is_special;
use pulplua_core::{TileTable, TranspileContext};

#[test]
fn valid_identifiers_pass_through_sanitize() {
    for name in ["score", "_tmp", "x1", "CamelCase", "a_b_c"] {
        assert!(is_identifier(name), "{} should be an identifier", name);
        assert_eq!(sanitize(name), name);
        assert_eq!(sanitize(&sanitize(name)), name);
    }
}

#[test]
fn other_names_become_global_lookups() {
    assert_eq!(sanitize("foo bar"), r#"_G["foo bar"]"#);
    assert_eq!(sanitize("1st"), r#"_G["1st"]"#);
    assert_eq!(sanitize("say \"hi\""), r#"_G["say \"hi\""]"#);
    assert_eq!(sanitize("back\\slash"), r#"_G["back\\slash"]"#);
    assert_eq!(sanitize("end"), r#"_G["end"]"#);
    assert_eq!(sanitize("ending"), "ending");
}

#[test]
fn escape_covers_quotes_newlines_and_form_feeds() {
    assert_eq!(escape_string("a\"b"), r#"a\"b"#);
    assert_eq!(escape_string("line\nnext"), r#"line\nnext"#);
    assert_eq!(escape_string("page\u{000C}break"), r#"page\fbreak"#);
    assert_eq!(quote("x"), "\"x\"");
}

#[test]
fn tokens_allow_dots_but_not_spaces_or_dashes() {
    assert!(is_token("event.x"));
    assert!(is_token("score"));
    assert!(!is_token("two words"));
    assert!(!is_token("a-b"));
    assert!(!is_token("9lives"));
    assert!(!is_token(""));
}

#[test]
fn register_use_counts_raw_names() {
    let mut ctx = TranspileContext::new(TileTable::new());
    assert_eq!(register_use("score", &mut ctx), "score");
    assert_eq!(register_use("score", &mut ctx), "score");
    assert_eq!(register_use("foo bar", &mut ctx), r#"_G["foo bar"]"#);

    assert_eq!(ctx.usage_counts.get("score"), Some(&2));
    assert_eq!(ctx.usage_counts.get("foo bar"), Some(&1));
    assert!(ctx.known_variables.contains("score"));
    assert!(ctx.known_variables.contains(r#"_G["foo bar"]"#));
}

#[test]
fn reserved_prefix_gets_one_more_underscore() {
    let mut ctx = TranspileContext::new(TileTable::new());
    for name in ["__secret", "__", "___three", "__with space"] {
        let ident = register_use(name, &mut ctx);
        assert_eq!(ident, sanitize(&format!("_{}", name)), "for {}", name);
        assert_eq!(variable_identifier(name), ident);
    }
    assert_eq!(register_use("_single", &mut ctx), "_single");
    assert!(ctx.known_variables.contains("___secret"));
    assert_eq!(ctx.usage_counts.get("__secret"), Some(&1));
}

#[test]
fn dotted_and_extension_names_are_not_counted() {
    let mut ctx = TranspileContext::new(TileTable::new());
    assert_eq!(register_use("event.x", &mut ctx), "event.x");
    assert_eq!(register_use("__PTLE_V_DAS", &mut ctx), "__PTLE_V_DAS");
    assert!(ctx.usage_counts.is_empty());
    assert!(ctx.known_variables.is_empty());
}

#[test]
fn cached_special_vars_register_a_binding() {
    let mut ctx = TranspileContext::new(TileTable::new());
    let (expr, bindings) = ctx
        .with_cache_frame(|ctx| Ok(remap("event.x", ctx)))
        .expect("frame");
    assert_eq!(expr, "__event_x");
    assert_eq!(bindings, vec!["local __event_x = __actor.x or __pulp.player.x".to_string()]);
    assert_eq!(ctx.cache_depth(), 0);
}

#[test]
fn plain_special_vars_need_no_binding() {
    let mut ctx = TranspileContext::new(TileTable::new());
    let (exprs, bindings) = ctx
        .with_cache_frame(|ctx| {
            Ok(vec![
                remap("event.room", ctx),
                remap("event.player", ctx),
                remap("datetime.day", ctx),
                remap("datetime.weekday", ctx),
                remap("datetime.timestamp", ctx),
                remap("__PTLE_H_DAS", ctx),
            ])
        })
        .expect("frame");
    assert_eq!(
        exprs,
        vec![
            "event.room.name",
            "__pulp.player.name",
            "__getTime().day",
            "(__getTime().weekday - 1)",
            "__getSecondsSinceEpoch()",
            "__pulp.PTLE_H_DAS",
        ]
    );
    assert!(bindings.is_empty());
}

#[test]
fn unknown_names_map_to_themselves() {
    let mut ctx = TranspileContext::new(TileTable::new());
    assert_eq!(remap("score", &mut ctx), "score");
    assert_eq!(remap("event.custom", &mut ctx), "event.custom");
    assert!(!is_special("event.custom"));
    assert!(is_special("datetime.hour12"));
}

#[test]
fn clock_fields_keep_their_annotations() {
    let mut ctx = TranspileContext::new(TileTable::new());
    assert_eq!(
        remap("datetime.hour12", &mut ctx),
        "--[[(hour12)]] ((__getTime().hour % 12) + 1)"
    );
    assert_eq!(
        remap("datetime.ampm", &mut ctx),
        "--[[(ampm)]] (__getTime().hour < 12 and \"am\" or \"pm\")"
    );
    assert_eq!(
        remap("datetime.year99", &mut ctx),
        "--[[(year99)]] (__getTime().year % 100)"
    );
}
