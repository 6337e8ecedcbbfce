use mrva_engine::{SessionSelector, aggregate};

use crate::cli::root_commands::StatusArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, summary, table_options};

/// Handle `mrva status`.
pub async fn handle(args: &StatusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let selector = match (&args.session, &args.prefix) {
        (Some(name), _) => SessionSelector::Name(name.clone()),
        (None, Some(prefix)) => SessionSelector::Prefix(prefix.clone()),
        (None, None) => anyhow::bail!("either --session or --prefix is required"),
    };

    let client = ctx.client()?;
    let policy = ctx.config.general.failed_run_policy;
    let all = aggregate(client.as_ref(), &ctx.store, &selector, policy).await?;
    if all.is_empty()
        && let SessionSelector::Prefix(prefix) = &selector
    {
        tracing::warn!(%prefix, "no sessions match prefix");
    }

    match flags.format {
        OutputFormat::Table => {
            let options = table_options();
            let blocks: Vec<String> = all
                .iter()
                .map(|results| summary::results_text(results, options))
                .collect();
            println!("{}", blocks.join("\n\n"));
            Ok(())
        }
        format => match all.as_slice() {
            [single] if matches!(selector, SessionSelector::Name(_)) => output(single, format),
            _ => output(&all, format),
        },
    }
}
