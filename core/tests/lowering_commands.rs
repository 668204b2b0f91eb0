use pulplua_core::ast::Command;
use pulplua_core::lower::{SELF_OBJECT, compile_block};
use pulplua_core::{Location, ScriptSource, TileTable, TranspileContext};
use serde_json::{Value, json};

fn decode(blocks: Value) -> ScriptSource {
    ScriptSource::from_json("player", &json!({ "__blocks": blocks })).expect("failed to decode")
}

fn context(tiles: TileTable) -> TranspileContext {
    let mut ctx = TranspileContext::new(tiles);
    ctx.root_dispatch_object = "__script[1]".to_string();
    ctx
}

fn compile_with(blocks: Value, ctx: &mut TranspileContext) -> String {
    let src = decode(blocks);
    ctx.with_dispatch_object(SELF_OBJECT, |ctx| compile_block(&src, 0, ctx, true))
        .expect("failed to compile")
}

fn compile(blocks: Value) -> String {
    compile_with(blocks, &mut context(TileTable::new()))
}

#[test]
fn set_then_add_share_the_identifier() {
    let mut ctx = context(TileTable::new());
    let out = compile_with(
        json!([[["set", "score", ["get", "score"]], ["add", "score", 1]]]),
        &mut ctx,
    );
    assert_eq!(out, "  score = score\n  score += 1\n");
    assert_eq!(ctx.usage_counts.get("score"), Some(&3));
}

#[test]
fn assignment_family_uses_compound_operators() {
    let out = compile(json!([[
        ["sub", "hp", 1],
        ["mul", "hp", 2],
        ["div", "hp", ["get", "scale"]]
    ]]));
    assert_eq!(out, "  hp -= 1\n  hp *= 2\n  hp /= scale\n");
}

#[test]
fn inc_and_dec_register_the_variable() {
    let mut ctx = context(TileTable::new());
    let out = compile_with(json!([[["inc", "__count"], ["dec", "lives"]]]), &mut ctx);
    assert_eq!(out, "  ___count += 1\n  lives -= 1\n");
    assert!(ctx.known_variables.contains("___count"));
}

#[test]
fn random_takes_one_or_two_operands() {
    assert_eq!(compile(json!([[["random", 6]]])), "  __random(6)\n");
    assert_eq!(compile(json!([[["random", 1, 6]]])), "  __random(1, 6)\n");
    assert!(Command::decode(&json!(["random"])).is_err());
    assert!(Command::decode(&json!(["random", 1, 2, 3])).is_err());
}

#[test]
fn if_chain_with_elseif_and_else() {
    let out = compile(json!([
        [[
            "if", ["gt", "x", 1], ["block", 1],
            ["elseif", ["eq", "x", 1], ["block", 2]],
            ["else", ["block", 3]]
        ]],
        [["inc", "a"]],
        [["inc", "b"]],
        [["inc", "c"]]
    ]));
    assert_eq!(
        out,
        "  if x > 1 then\n    a += 1\n  elseif x == 1 then\n    b += 1\n  else\n    c += 1\n  end\n"
    );
}

#[test]
fn nested_elseif_continuations_are_flattened() {
    let out = compile(json!([
        [[
            "if", ["lt", "x", 0], ["block", 1],
            ["elseif", ["lte", "x", 5], ["block", 1], ["elseif", ["neq", "x", 9], ["block", 1]]]
        ]],
        [["inc", "a"]]
    ]));
    assert_eq!(
        out,
        "  if x < 0 then\n    a += 1\n  elseif x <= 5 then\n    a += 1\n  elseif x ~= 9 then\n    a += 1\n  end\n"
    );
}

#[test]
fn while_loop() {
    let out = compile(json!([[["while", ["gte", "i", ["get", "n"]], ["block", 1]]], [["dec", "i"]]]));
    assert_eq!(out, "  while i >= n do\n    i -= 1\n  end\n");
}

#[test]
fn malformed_conditions_are_fatal() {
    assert!(Command::decode(&json!(["if", ["approx", "x", 1], ["block", 1]])).is_err());
    assert!(Command::decode(&json!(["if", ["eq", "x", 1], ["block", 1], ["otherwise", ["block", 2]]])).is_err());
    assert!(Command::decode(&json!(["if", ["eq", "x", 1], 7])).is_err());
    assert!(Command::decode(&json!(["while", ["eq", "x", 1], ["block", 1], ["else", ["block", 2]]])).is_err());
}

#[test]
fn emit_done_and_blank_lines() {
    let out = compile(json!([[["emit", "open"], ["_"], ["done"]]]));
    assert_eq!(out, "  __pulp:emit(\"open\", event)\n  do return end\n");
}

#[test]
fn unknown_command_is_reported_and_skipped() {
    let mut ctx = context(TileTable::new());
    let out = compile_with(json!([[["teleport", 1], ["inc", "n"]]]), &mut ctx);
    assert_eq!(out, "  --unknown command code 'teleport'\n  n += 1\n");
    assert_eq!(ctx.diagnostics.len(), 1);
    assert_eq!(ctx.diagnostics[0].message, "unknown command code: teleport");
    assert_eq!(
        ctx.diagnostics[0].location,
        Some(Location::new("player".to_string(), 0, 0))
    );
}

#[test]
fn mimic_by_name_uses_the_registry() {
    let out = compile(json!([[["mimic", "ghost"]]]));
    assert_eq!(
        out,
        "  do -- (mimic)\n    local __mimic_target__ = __pulp:getScript(\"ghost\") or __pulp.EMPTY;\n    (__mimic_target__[__evname] or __mimic_target__.any)(__actor, event, __evname)\n  end\n"
    );
}

#[test]
fn mimic_of_known_tile_indexes_by_id() {
    let tiles: TileTable = [("door".to_string(), 7)].into_iter().collect();
    let out = compile_with(json!([[["mimic", "door"]]]), &mut context(tiles));
    assert_eq!(
        out,
        "  do -- (mimic)\n    local __mimic_target__ = (__pulp.tiles[7 --[[(door)]]] or __pulp.EMPTY).script;\n    (__mimic_target__[__evname] or __mimic_target__.any)(__actor, event, __evname)\n  end\n"
    );

    let out = compile(json!([[["mimic", 3]]]));
    assert!(out.contains("(__pulp.tiles[3] or __pulp.EMPTY).script;"));
}

#[test]
fn tell_at_coordinates_is_inlined() {
    let out = compile(json!([[["tell", ["xy", 1, 2], ["block", 1]]], [["call", "hit"]]]));
    assert_eq!(
        out,
        "  do --[tell x,y to]\n    local __actor = __roomtiles[2][1]\n    if __actor and __actor.tile then\n      ;(__actor.script.hit or __actor.script.any)(__actor, event, \"hit\") --[call \"hit\"]\n    end\n  end\n"
    );
}

#[test]
fn tell_implicit_targets_bind_directly() {
    let out = compile(json!([[["tell", ["get", "event.player"], ["block", 1]]], [["inc", "n"]]]));
    assert_eq!(
        out,
        "  do --[tell __pulp.player to]\n    local __actor = __pulp.player\n    if __actor then\n      n += 1\n    end\n  end\n"
    );

    let out = compile(json!([[["tell", ["get", "event.room"], ["block", 1]]], []]));
    assert!(out.starts_with("  do --[tell event.room to]\n    local __actor = event.room\n"));
}

#[test]
fn tell_generic_form_goes_through_the_runtime() {
    let tiles: TileTable = [("door".to_string(), 7)].into_iter().collect();
    let out = compile_with(
        json!([[["tell", "door", ["block", 1]]], [["call", "open"]]]),
        &mut context(tiles),
    );
    assert_eq!(
        out,
        "  __pulp.__fn_tell(event, __evname, function(__actor, event, evname)\n      ;(__actor.script.open or __actor.script.any)(__actor, event, \"open\") --[call \"open\"]\n    end, 7 --[[(door)]])\n"
    );
}

#[test]
fn inline_tell_without_block_is_fatal() {
    let src = decode(json!([[["tell", ["xy", 1, 2], 5]]]));
    let mut ctx = context(TileTable::new());
    let result = ctx.with_dispatch_object(SELF_OBJECT, |ctx| compile_block(&src, 0, ctx, true));
    assert!(result.is_err());
    assert_eq!(ctx.cache_depth(), 0);
    assert_eq!(ctx.dispatch_depth(), 0);
    assert_eq!(ctx.indent, 1);
}

#[test]
fn missing_block_is_a_structural_error() {
    let src = decode(json!([[["if", ["eq", "x", 1], ["block", 9]]]]));
    let mut ctx = context(TileTable::new());
    let err = ctx
        .with_dispatch_object(SELF_OBJECT, |ctx| compile_block(&src, 0, ctx, true))
        .expect_err("block 9 does not exist");
    assert!(err.message().contains("block 9"));
    assert_eq!(ctx.cache_depth(), 0);
    assert_eq!(ctx.dispatch_depth(), 0);
    assert_eq!(ctx.indent, 1);
}
