use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DeleteArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct Deleted {
    deleted: String,
    runs: usize,
}

/// Handle `mrva delete`.
pub fn handle(args: &DeleteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let removed = ctx.store.delete(&args.session)?;
    tracing::info!(session = %removed.name, "deleted session");
    output(
        &Deleted {
            deleted: removed.name,
            runs: removed.runs.len(),
        },
        flags.format,
    )
}
