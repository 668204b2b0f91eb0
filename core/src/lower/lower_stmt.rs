//! file: core/src/lower/lower_stmt.rs
//! description: command and block lowering.
//!
//! Every command lowers to one statement (possibly spanning several
//! lines) prefixed with the current indentation and terminated by a
//! newline. Blocks that open a Lua function scope get their own cache
//! frame; its bindings are written ahead of the body, sorted.
use super::context::{SELF_OBJECT, TranspileContext};
use super::directive::{CallTags, collect_call_tags, compile_comment};
use super::err::StructuralError;
use super::lower_call::{CallPrefix, resolve_call};
use super::lower_expr::lower_expr;
use super::naming::{escape_string, is_identifier, quote, register_use};
use crate::ast::{Arg, Branch, CallTarget, Command, Condition, Expr, ScriptSource};
use crate::error::CompileResult;
use crate::location::Location;
use crate::opt::{register_script_tag, resolve_tile_arg, resolve_tile_ref};

const ISSUER: &str = "pulplua.lower.stmt";

/// Objects `tell` can target directly without a runtime lookup.
const IMPLICIT_TELL_TARGETS: [&str; 3] = ["event.room", "event.game", "event.player"];

/// Lower block `block_idx` of `src` at the current indentation.
pub fn compile_block(
    src: &ScriptSource,
    block_idx: usize,
    ctx: &mut TranspileContext,
    opens_scope: bool,
) -> CompileResult<String> {
    let commands = src.block(block_idx)?;
    if !opens_scope {
        return compile_commands(src, block_idx, commands, ctx);
    }

    let (body, bindings) =
        ctx.with_cache_frame(|ctx| compile_commands(src, block_idx, commands, ctx))?;
    let gi = ctx.gi();
    let mut out = String::new();
    for binding in bindings {
        out.push_str(&gi);
        out.push_str(&binding);
        out.push('\n');
    }
    out.push_str(&body);
    Ok(out)
}

fn compile_commands(
    src: &ScriptSource,
    block_idx: usize,
    commands: &[Command],
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    let mut out = String::new();
    for (i, cmd) in commands.iter().enumerate() {
        let tags = collect_call_tags(&commands[i + 1..], src);
        let outer = ctx.set_cursor(Some(Location::new(src.name.clone(), block_idx, i)));
        let lowered = compile_command(cmd, &tags, src, ctx);
        ctx.set_cursor(outer);

        if let Some(stmt) = lowered? {
            out.push_str(&ctx.gi());
            out.push_str(&stmt);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Lower one command without its leading indentation or trailing newline.
/// `None` means the command produces no output.
pub fn compile_command(
    cmd: &Command,
    tags: &CallTags<'_>,
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<Option<String>> {
    log::trace!("lowering {:?}", cmd);
    let stmt = match cmd {
        Command::Blank => return Ok(None),
        Command::Done => "do return end".to_string(),
        Command::Assign { op, target, value } => {
            let lvalue = register_use(target, ctx);
            let rvalue = lower_expr(value, src, ctx)?;
            format!("{} {} {}", lvalue, op.operator(), rvalue)
        }
        Command::Inc(name) => format!("{} += 1", register_use(name, ctx)),
        Command::Dec(name) => format!("{} -= 1", register_use(name, ctx)),
        Command::Random { low, high } => {
            let low = lower_expr(low, src, ctx)?;
            match high {
                Some(high) => format!("__random({}, {})", low, lower_expr(high, src, ctx)?),
                None => format!("__random({})", low),
            }
        }
        Command::If { cond, body, branches } => {
            let mut s = format!("if {} then\n", lower_condition(cond, src, ctx)?);
            s.push_str(&ctx.indented(1, |ctx| compile_block(src, *body, ctx, false))?);
            s.push_str(&lower_branches(branches, src, ctx)?);
            s.push_str(&ctx.gi());
            s.push_str("end");
            s
        }
        Command::While { cond, body } => {
            let mut s = format!("while {} do\n", lower_condition(cond, src, ctx)?);
            s.push_str(&ctx.indented(1, |ctx| compile_block(src, *body, ctx, false))?);
            s.push_str(&ctx.gi());
            s.push_str("end");
            s
        }
        Command::Call(target) => lower_call_site(target, tags, src, ctx)?,
        Command::Emit(value) => format!("__pulp:emit({}, event)", lower_expr(value, src, ctx)?),
        Command::Mimic(target) => lower_mimic(target, src, ctx)?,
        Command::Tell { target, rest } => lower_tell(target, rest, src, ctx)?,
        Command::Builtin { func, args } => {
            resolve_call(func.name(), CallPrefix::Statement, args, src, ctx)?
        }
        Command::Comment { index, inline } => return Ok(compile_comment(*index, *inline, src, ctx)),
        Command::Unknown(tag) => {
            ctx.diagnose(format!("unknown command code: {}", tag), ISSUER);
            format!("--unknown command code '{}'", tag.replace('\n', " "))
        }
    };
    Ok(Some(stmt))
}

fn lower_condition(
    cond: &Condition,
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    let left = lower_expr(&cond.left, src, ctx)?;
    let right = lower_expr(&cond.right, src, ctx)?;
    Ok(format!("{} {} {}", left, cond.op.symbol(), right))
}

/// `elseif`/`else` continuations, at the indentation of the opening `if`.
fn lower_branches(
    branches: &[Branch],
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    let mut s = String::new();
    for branch in branches {
        match branch {
            Branch::ElseIf { cond, body, branches } => {
                s.push_str(&ctx.gi());
                s.push_str(&format!("elseif {} then\n", lower_condition(cond, src, ctx)?));
                s.push_str(&ctx.indented(1, |ctx| compile_block(src, *body, ctx, false))?);
                s.push_str(&lower_branches(branches, src, ctx)?);
            }
            Branch::Else { body } => {
                s.push_str(&ctx.gi());
                s.push_str("else\n");
                s.push_str(&ctx.indented(1, |ctx| compile_block(src, *body, ctx, false))?);
            }
        }
    }
    Ok(s)
}

// ------- call -------

fn lower_call_site(
    target: &CallTarget,
    tags: &CallTags<'_>,
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    let evobj = ctx.dispatch_object().to_string();

    // (callee expression, event-name argument, handler name, statically named?)
    let (callfn, fnstr, call_name, is_static) = match target {
        CallTarget::Name(name) if is_identifier(name) => {
            (format!("{}.{}", evobj, name), quote(name), name.clone(), true)
        }
        CallTarget::Name(name) => (format!("{}[{}]", evobj, quote(name)), quote(name), name.clone(), true),
        CallTarget::Expr(expr) => {
            let lowered = lower_expr(expr, src, ctx)?;
            let call_name = match expr {
                Expr::Str(s) => s.clone(),
                _ => lowered.clone(),
            };
            (format!("{}[{}]", evobj, lowered), lowered, call_name, false)
        }
    };

    let mut fnbase = format!(";({} or {}.any)", callfn, evobj);
    let mut comment = format!("--[call \"{}\"]", escape_string(&call_name));

    if tags.direct {
        fnbase = callfn.clone();
        comment.push_str(" [DIRECT]");
    }

    if evobj == SELF_OBJECT {
        let root = ctx.root_dispatch_object.clone();
        ctx.cache_binding(&format!("local {} = {} --[this script]", SELF_OBJECT, root));
        if is_static {
            if ctx.known_handler_names.contains(&call_name) {
                fnbase = callfn.clone();
                comment.clear();
            } else if !tags.direct {
                fnbase = format!("{}.any", SELF_OBJECT);
                comment.push_str(" [doesn't exist, so any]");
            }
        }
    }

    for (source, tag_text) in &tags.scripts {
        fnbase = register_script_tag(ctx, source, &call_name);
        comment.push(' ');
        comment.push_str(tag_text);
    }

    let stmt = format!("{}(__actor, event, {}) {}", fnbase, fnstr, comment);
    Ok(stmt.trim_end().to_string())
}

// ------- mimic -------

fn lower_mimic(target: &Expr, src: &ScriptSource, ctx: &mut TranspileContext) -> CompileResult<String> {
    let target = resolve_tile_ref(target, &ctx.tiles);
    let by_id = matches!(target.as_ref(), Expr::ResolvedId { .. } | Expr::Int(_));
    let value = lower_expr(&target, src, ctx)?;
    let lookup = if by_id {
        format!("(__pulp.tiles[{}] or __pulp.EMPTY).script;", value)
    } else {
        format!("__pulp:getScript({}) or __pulp.EMPTY;", value)
    };

    let inner = ctx.indented(1, |ctx| {
        let gi = ctx.gi();
        format!(
            "{gi}local __mimic_target__ = {lookup}\n\
             {gi}(__mimic_target__[__evname] or __mimic_target__.any)(__actor, event, __evname)\n"
        )
    });
    Ok(format!("do -- (mimic)\n{}{}end", inner, ctx.gi()))
}

// ------- tell -------

fn lower_tell(
    target: &Arg,
    rest: &[Arg],
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    match target {
        Arg::Xy(x, y) => {
            let x = lower_expr(x, src, ctx)?;
            let y = lower_expr(y, src, ctx)?;
            let actor = format!("__roomtiles[{}][{}]", y, x);
            lower_inline_tell("x,y", &actor, "__actor and __actor.tile", rest, src, ctx)
        }
        Arg::Value(Expr::Get(name)) if IMPLICIT_TELL_TARGETS.contains(&name.as_str()) => {
            let actor = if name == "event.player" { "__pulp.player" } else { name.as_str() };
            lower_inline_tell(actor, actor, "__actor", rest, src, ctx)
        }
        _ => {
            let mut args = vec![resolve_tile_arg(target, &ctx.tiles).into_owned()];
            args.extend(rest.iter().cloned());
            ctx.with_dispatch_object("__actor.script", |ctx| {
                resolve_call("tell", CallPrefix::Statement, &args, src, ctx)
            })
        }
    }
}

/// `tell` with a target known at compile time: bind `__actor` locally and
/// compile the body in place instead of passing a closure to the runtime.
fn lower_inline_tell(
    label: &str,
    actor: &str,
    guard: &str,
    rest: &[Arg],
    src: &ScriptSource,
    ctx: &mut TranspileContext,
) -> CompileResult<String> {
    let Some(Arg::Value(Expr::Block(block))) = rest.first() else {
        return Err(StructuralError::new(
            format!("'tell {} to' must be followed by a block", label),
            ISSUER,
        )
        .boxed());
    };

    let inner = ctx.indented(1, |ctx| -> CompileResult<String> {
        let gi = ctx.gi();
        let mut s = format!("{gi}local __actor = {actor}\n{gi}if {guard} then\n");
        let body = ctx.indented(1, |ctx| {
            ctx.with_dispatch_object("__actor.script", |ctx| compile_block(src, *block, ctx, true))
        })?;
        s.push_str(&body);
        s.push_str(&gi);
        s.push_str("end\n");
        Ok(s)
    })?;
    Ok(format!("do --[tell {} to]\n{}{}end", label, inner, ctx.gi()))
}
