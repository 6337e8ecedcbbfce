use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, summary, table_options};

/// Handle `mrva list`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let sessions = ctx.store.list()?;
    match flags.format {
        OutputFormat::Table => {
            println!("{}", summary::sessions_text(&sessions, table_options()));
            Ok(())
        }
        format => output(&sessions, format),
    }
}
