use clap::ValueEnum;

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON document.
    Json,
    /// Aligned columns and human summaries.
    Table,
    /// Single-line JSON, for piping into other tools.
    Raw,
}

/// Flags accepted by every subcommand.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}

impl GlobalFlags {
    /// Log filter used when `MRVA_LOG` is unset. `--quiet` wins over `--verbose`.
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, true) => {
                "warn,mrva=debug,mrva_engine=debug,mrva_client=debug,mrva_pack=debug,mrva_store=debug"
            }
            (false, false) => "warn",
        }
    }
}
