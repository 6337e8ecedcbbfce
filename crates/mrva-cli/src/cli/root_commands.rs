use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Submit a query or query suite against a repository list.
    Submit(SubmitArgs),
    /// Show the status and findings of one or more sessions.
    Status(StatusArgs),
    /// Download results (and optionally databases) of a session or run.
    Download(DownloadArgs),
    /// List stored sessions.
    List,
    /// Delete a stored session.
    Delete(DeleteArgs),
}

/// Arguments for `mrva submit`.
#[derive(Clone, Debug, Args)]
#[command(group(ArgGroup::new("queries").required(true).args(["query", "query_suite"])))]
pub struct SubmitArgs {
    /// Name under which the session is stored.
    #[arg(short, long)]
    pub session: String,
    /// Source language of the target repositories.
    #[arg(short, long)]
    pub language: String,
    /// Path to a single query file.
    #[arg(short, long)]
    pub query: Option<PathBuf>,
    /// Path to a query suite file.
    #[arg(short = 'x', long)]
    pub query_suite: Option<PathBuf>,
    /// Controller repository (owner/repo).
    #[arg(short, long)]
    pub controller: Option<String>,
    /// JSON file holding repository lists.
    #[arg(short = 'f', long)]
    pub list_file: Option<PathBuf>,
    /// Name of the list in the list file.
    #[arg(short = 'i', long)]
    pub list: String,
    /// CodeQL distribution or extra packs directory.
    #[arg(short = 'p', long)]
    pub codeql_path: Option<PathBuf>,
}

/// Arguments for `mrva status`.
#[derive(Clone, Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["session", "prefix"])))]
pub struct StatusArgs {
    /// Session name.
    #[arg(short, long)]
    pub session: Option<String>,
    /// Report every session whose name starts with this prefix.
    #[arg(short, long)]
    pub prefix: Option<String>,
}

/// Arguments for `mrva download`.
#[derive(Clone, Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["session", "run"])))]
pub struct DownloadArgs {
    /// Session name.
    #[arg(short, long)]
    pub session: Option<String>,
    /// Download a single run instead of a whole session.
    #[arg(short, long)]
    pub run: Option<u64>,
    /// Directory to write results into (created if absent).
    #[arg(short, long)]
    pub output_dir: PathBuf,
    /// Also download the analysis databases.
    #[arg(short = 'd', long)]
    pub download_dbs: bool,
    /// Only download this repository (owner/repo).
    #[arg(short, long)]
    pub nwo: Option<String>,
}

/// Arguments for `mrva delete`.
#[derive(Clone, Debug, Args)]
pub struct DeleteArgs {
    /// Session name.
    #[arg(short, long)]
    pub session: String,
}
