use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub status_lines: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(flags, std::io::stdout().is_terminal()));
}

fn resolve(flags: &GlobalFlags, is_tty: bool) -> UiPrefs {
    let table_color = is_tty
        && flags.format == OutputFormat::Table
        && !flags.quiet
        && std::env::var_os("NO_COLOR").is_none();

    let progress = is_tty && !flags.quiet && flags.format != OutputFormat::Json;

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        status_lines: !progress && !flags.quiet,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        status_lines: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet,
            verbose: false,
        }
    }

    #[test]
    fn json_on_tty_uses_status_lines() {
        let prefs = resolve(&flags(OutputFormat::Json, false), true);
        assert!(!prefs.progress);
        assert!(prefs.status_lines);
    }

    #[test]
    fn table_on_tty_uses_bar() {
        let prefs = resolve(&flags(OutputFormat::Table, false), true);
        assert!(prefs.progress);
        assert!(!prefs.status_lines);
    }

    #[test]
    fn quiet_silences_everything() {
        let prefs = resolve(&flags(OutputFormat::Table, true), true);
        assert!(!prefs.progress);
        assert!(!prefs.status_lines);
        assert!(!prefs.table_color);
    }

    #[test]
    fn piped_output_never_draws_bars() {
        assert!(!resolve(&flags(OutputFormat::Table, false), false).progress);
    }
}
