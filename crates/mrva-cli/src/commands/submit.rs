use std::path::PathBuf;

use mrva_engine::{MAX_REPOSITORIES_PER_RUN, SubmitRequest, ensure_available, submit};
use mrva_pack::{
    BundleBuilder, CodeqlPackBuilder, JsonListResolver, RepositoryListResolver, Toolchain,
    resolve_queries,
};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::context::{AppContext, resolve_setting};
use crate::output::output;
use crate::progress::BundleSpinner;

#[derive(Serialize)]
struct Submitted {
    session: String,
    controller: String,
    language: String,
    repositories: usize,
    runs: Vec<u64>,
}

/// Settings for one submission after applying config defaults.
struct SubmitSettings {
    controller: String,
    list_file: PathBuf,
    codeql_path: Option<PathBuf>,
}

impl SubmitSettings {
    fn resolve(args: &SubmitArgs, ctx: &AppContext) -> anyhow::Result<Self> {
        let general = &ctx.config.general;
        Ok(Self {
            controller: resolve_setting(
                args.controller.as_ref(),
                general.controller.as_ref(),
                "--controller",
                "general.controller",
            )?,
            list_file: resolve_setting(
                args.list_file.as_ref(),
                general.list_file.as_ref(),
                "--list-file",
                "general.list_file",
            )?,
            codeql_path: args.codeql_path.clone().or_else(|| general.codeql_path.clone()),
        })
    }
}

/// Handle `mrva submit`.
pub async fn handle(args: &SubmitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let settings = SubmitSettings::resolve(args, ctx)?;
    ensure_available(&ctx.store, &args.session)?;

    let repositories = JsonListResolver.resolve(&settings.list_file, &args.list)?;
    tracing::info!(list = %args.list, count = repositories.len(), "resolved repositories");

    let toolchain = Toolchain::new(settings.codeql_path);
    let queries = resolve_queries(
        &toolchain,
        args.query.as_deref(),
        args.query_suite.as_deref(),
    )
    .await?;

    let builder = CodeqlPackBuilder::new(toolchain);
    let spinner = BundleSpinner::start(queries.len());
    let mut bundles = Vec::with_capacity(queries.len());
    for query in &queries {
        spinner.bundling(query);
        match builder.build(query, &args.language).await {
            Ok(bundle) => bundles.push(bundle),
            Err(error) => {
                spinner.failed(query);
                return Err(anyhow::Error::new(error)
                    .context(format!("failed to bundle {}", query.display())));
            }
        }
        spinner.bundled();
    }
    spinner.done();

    let client = ctx.client()?;
    let request = SubmitRequest {
        name: args.session.clone(),
        controller: settings.controller,
        language: args.language.clone(),
        list_file: settings.list_file.display().to_string(),
        list: args.list.clone(),
        repositories,
        bundles,
    };
    let session = submit(client.as_ref(), &ctx.store, request, MAX_REPOSITORIES_PER_RUN).await?;

    output(
        &Submitted {
            runs: session.runs.iter().map(|run| run.id).collect(),
            session: session.name,
            controller: session.controller,
            language: session.language,
            repositories: session.repository_count,
        },
        flags.format,
    )
}
