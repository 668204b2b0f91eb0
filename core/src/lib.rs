pub mod ast;
pub mod config;
pub mod error;
pub mod glue;
pub mod location;
pub mod lower;
pub mod opt;
pub mod reports;
pub mod script;

pub use ast::{Command, Expr, ScriptSource};
pub use config::{ExtValue, ExtensionConfig};
pub use error::{CompileResult, Diagnostic, Level, PulpluaErrorExt};
pub use location::Location;
pub use lower::{TranspileContext, compile_handler};
pub use opt::TileTable;
pub use reports::CompileReport;
pub use script::{ScriptEntry, ScriptKind, ScriptRegistry, compile_export, compile_script};

/// Extension setting that turns on the static delegation table.
pub const FULL_MIMICS_SETTING: &str = "fullMimics";

pub fn generate_error_report(error: &dyn PulpluaErrorExt) -> String {
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    format!("PULPLUA | {} | {} | {}", error.level(), location, error.message())
}

/// Compile a whole game export: variable declarations, every script, the
/// variable accessors and routing tags. The delegation table is only
/// emitted when a script sets `[PTL] fullMimics = true`.
///
/// Returns the Lua source together with the run's report.
pub fn compile_game(export: &serde_json::Value) -> CompileResult<(String, CompileReport)> {
    let tiles = export.get("tiles").map(TileTable::from_json).unwrap_or_default();
    let mut ctx = TranspileContext::new(tiles);

    let scripts = compile_export(export, &mut ctx)?;

    let mut code = glue::variable_prologue(&ctx);
    code.push('\n');
    code.push_str(&scripts);
    if ctx.extension_config.ptl_enabled(FULL_MIMICS_SETTING) {
        code.push_str(&glue::delegation_table(&ctx.full_delegation_records));
    }
    code.push('\n');
    code.push_str(&glue::variable_accessors(&ctx));
    code.push_str(&glue::script_tag_bindings(&ctx));

    let report = ctx.report();
    for message in report.unique_messages() {
        log::info!("--{}", message);
    }
    Ok((code, report))
}
