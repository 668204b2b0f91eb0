use std::borrow::Cow;

use pulplua_core::ast::{Arg, Expr, Handler};
use pulplua_core::opt::{
    DelegationRecord, ScriptTag, register_script_tag, resolve_tile_arg, resolve_tile_ref,
    single_delegation_target,
};
use pulplua_core::{Command, ScriptSource, TileTable, TranspileContext, compile_handler};
use serde_json::{Value, json};

fn tiles() -> TileTable {
    [("door".to_string(), 7), ("wall".to_string(), 2)].into_iter().collect()
}

fn source(blocks: Value) -> ScriptSource {
    ScriptSource::from_json("gate", &json!({ "interact": ["block", 0], "__blocks": blocks }))
        .expect("failed to decode")
}

#[test]
fn known_tile_names_fold_to_ids() {
    let tiles = tiles();
    let named = Expr::Str("door".into());
    match resolve_tile_ref(&named, &tiles) {
        Cow::Owned(expr) => assert_eq!(expr, Expr::ResolvedId { id: 7, name: "door".into() }),
        Cow::Borrowed(_) => panic!("door should fold"),
    }

    let unknown = Expr::Str("window".into());
    assert!(matches!(resolve_tile_ref(&unknown, &tiles), Cow::Borrowed(_)));
    let computed = Expr::Get("door".into());
    assert!(matches!(resolve_tile_ref(&computed, &tiles), Cow::Borrowed(_)));
}

#[test]
fn only_value_args_are_folded() {
    let tiles = tiles();
    let arg = Arg::Value(Expr::Str("wall".into()));
    assert_eq!(
        resolve_tile_arg(&arg, &tiles).into_owned(),
        Arg::Value(Expr::ResolvedId { id: 2, name: "wall".into() })
    );

    let xy = Arg::Xy(Expr::Str("door".into()), Expr::Int(1));
    assert!(matches!(resolve_tile_arg(&xy, &tiles), Cow::Borrowed(_)));
}

#[test]
fn tile_table_skips_peculiar_entries() {
    let table = TileTable::from_json(&json!([
        { "name": "grass", "id": 0 },
        { "name": "door", "id": 7 },
        { "name": "broken" },
        { "id": 4 },
        "nonsense"
    ]));
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("door"), Some(7));
    assert_eq!(table.get("broken"), None);

    assert!(TileTable::from_json(&json!({ "door": 7 })).is_empty());
}

#[test]
fn sole_mimic_of_a_tile_is_recorded() {
    let src = source(json!([[["#", 0], ["mimic", "door"], ["_"]]]));
    let mut ctx = TranspileContext::new(tiles());
    let handler = Handler { event: "interact".into(), block: 0 };
    let out = compile_handler(&src, "gate", "__script[2]", &handler, &mut ctx)
        .expect("failed to compile");

    assert!(out.starts_with("__pulp:getScript(\"gate\").interact = function(__actor, event, __evname)\n"));
    assert!(out.contains("(__pulp.tiles[7 --[[(door)]]] or __pulp.EMPTY).script;"));
    assert!(!out.contains("local __self"));
    assert!(out.ends_with("  end\nend\n"));
    assert_eq!(
        ctx.full_delegation_records,
        vec![DelegationRecord {
            owner: "gate".into(),
            event: "interact".into(),
            target_id: 7,
            target_name: "door".into(),
        }]
    );
}

#[test]
fn mimic_with_other_work_is_not_collapsed() {
    let src = source(json!([[["mimic", "door"], ["inc", "n"]]]));
    let mut ctx = TranspileContext::new(tiles());
    let handler = Handler { event: "interact".into(), block: 0 };
    compile_handler(&src, "gate", "__script[2]", &handler, &mut ctx).expect("failed to compile");
    assert!(ctx.full_delegation_records.is_empty());
}

#[test]
fn numeric_and_unknown_targets_are_not_recorded() {
    let tiles = tiles();
    let by_number = vec![Command::Mimic(Expr::Int(7))];
    assert_eq!(single_delegation_target(&by_number, &tiles), None);

    let unknown = vec![Command::Mimic(Expr::Str("window".into()))];
    assert_eq!(single_delegation_target(&unknown, &tiles), None);

    let folded = vec![
        Command::Blank,
        Command::Mimic(Expr::ResolvedId { id: 2, name: "wall".into() }),
    ];
    assert_eq!(single_delegation_target(&folded, &tiles), Some((2, "wall".to_string())));
    assert_eq!(single_delegation_target(&[], &tiles), None);
}

#[test]
fn script_tags_are_shared_per_pair() {
    let mut ctx = TranspileContext::default();
    let first = register_script_tag(&mut ctx, "door", "open");
    let again = register_script_tag(&mut ctx, "door", "open");
    assert_eq!(first, "__OPTTAG__door_open");
    assert_eq!(first, again);
    assert_eq!(ctx.script_tags.len(), 1);
}

#[test]
fn colliding_tag_names_get_a_suffix() {
    let mut ctx = TranspileContext::default();
    let a = register_script_tag(&mut ctx, "door", "open");
    let b = register_script_tag(&mut ctx, "door_open", "");
    let c = register_script_tag(&mut ctx, "door-open", "");
    assert_eq!(a, "__OPTTAG__door_open");
    assert_eq!(b, "__OPTTAG__door_open_");
    assert_eq!(c, "__OPTTAG__door_open__2");
    assert_eq!(
        ctx.script_tags.get(&c),
        Some(&ScriptTag { source: "door-open".into(), call: String::new() })
    );

    let d = register_script_tag(&mut ctx, "door", "open!");
    assert_eq!(d, "__OPTTAG__door_open__3");
    assert_eq!(ctx.script_tags.len(), 4);
}
