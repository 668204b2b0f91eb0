//! file: core/src/lower/lower_expr.rs
//! description: expression lowering.
use super::context::TranspileContext;
use super::lower_call::{CallPrefix, resolve_call};
use super::lower_stmt::compile_block;
use super::naming::{quote, register_use};
use super::special_vars::remap;
use crate::ast::{Arg, Expr, ExprFunc, ScriptSource};
use crate::error::CompileResult;

const ISSUER: &str = "pulplua.lower.expr";

/// `]]` would close the surrounding long comment early.
pub(crate) fn comment_safe(text: &str) -> String {
    text.replace("]]", "] ]")
}

/// Read of a variable or pseudo-variable.
pub fn lower_read(name: &str, ctx: &mut TranspileContext) -> String {
    let ident = register_use(name, ctx);
    remap(&ident, ctx)
}

pub fn lower_expr(expr: &Expr, src: &ScriptSource, ctx: &mut TranspileContext) -> CompileResult<String> {
    match expr {
        Expr::Str(s) => Ok(quote(s)),
        Expr::Int(i) => Ok(i.to_string()),
        Expr::Float(f) => Ok(format!("{:?}", f)),
        Expr::Nil => Ok("nil".to_string()),
        Expr::Get(name) => Ok(lower_read(name, ctx)),
        Expr::ResolvedId { id, name } => Ok(format!("{} --[[({})]]", id, comment_safe(name))),
        Expr::Format(parts) => {
            if parts.is_empty() {
                return Ok("\"\"".to_string());
            }
            let mut pieces = Vec::with_capacity(parts.len());
            for part in parts {
                let text = lower_expr(part, src, ctx)?;
                match part {
                    Expr::Str(_) => pieces.push(text),
                    _ => pieces.push(format!("__tostring({})", text)),
                }
            }
            Ok(pieces.join(" .. "))
        }
        Expr::Embed(inner) => Ok(format!("__pulp.__ex_embed({})", lower_expr(inner, src, ctx)?)),
        Expr::Func { func: ExprFunc::Name, args } => match args.first() {
            Some(Arg::Xy(x, y)) => {
                let x = lower_expr(x, src, ctx)?;
                let y = lower_expr(y, src, ctx)?;
                Ok(format!("__roomtiles[{}][{}].name", y, x))
            }
            _ => resolve_call(ExprFunc::Name.name(), CallPrefix::Expression, args, src, ctx),
        },
        Expr::Func { func, args } => resolve_call(func.name(), CallPrefix::Expression, args, src, ctx),
        // The subroutine's own event name arrives as `evname`; `__evname`
        // stays the enclosing handler's, so `mimic` inside the body
        // forwards the event that is being handled.
        Expr::Block(idx) => {
            let body = ctx.indented(2, |ctx| compile_block(src, *idx, ctx, true))?;
            Ok(format!(
                "function(__actor, event, evname)\n{}{}  end",
                body,
                ctx.gi()
            ))
        }
        Expr::Unknown(tag) => {
            ctx.diagnose(format!("unknown expression code: {}", tag), ISSUER);
            Ok(format!("nil --[[unknown expression code '{}']]", comment_safe(tag)))
        }
    }
}
