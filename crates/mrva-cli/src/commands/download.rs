use mrva_engine::{DownloadEvent, RetrievalRequest, retrieve};

use crate::cli::root_commands::DownloadArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, summary, table_options};
use crate::progress::DownloadProgress;

/// Handle `mrva download`.
pub async fn handle(
    args: &DownloadArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let session = match (&args.session, args.run) {
        (Some(name), _) => ctx.store.get(name)?,
        (None, Some(run_id)) => ctx.store.get_by_run_id(run_id)?,
        (None, None) => anyhow::bail!("either --session or --run is required"),
    };

    let request = RetrievalRequest {
        output_dir: args.output_dir.clone(),
        download_databases: args.download_dbs,
        nwo: args.nwo.clone(),
        workers: ctx.config.general.workers,
    };

    let client = ctx.client()?;
    let mut progress = DownloadProgress::from_prefs();
    let report = retrieve(client, &session, &request, |event: &DownloadEvent<'_>| {
        progress.record(event);
    })
    .await?;
    progress.finish(report.failures.len());

    match flags.format {
        OutputFormat::Table => {
            println!("{}", summary::report_text(&report, table_options()));
            Ok(())
        }
        format => output(&report, format),
    }
}
