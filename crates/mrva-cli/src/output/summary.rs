//! Human-readable renderings used by `--format table`.

use std::fmt::Write as _;

use mrva_core::{Results, Session, SkipCategory};
use mrva_engine::RetrievalReport;

use super::table::{Table, TableOptions};

fn skip_label(category: SkipCategory) -> &'static str {
    match category {
        SkipCategory::AccessMismatch => "access mismatch",
        SkipCategory::NotFound => "not found",
        SkipCategory::NoDatabase => "no database",
        SkipCategory::OverLimit => "over limit",
    }
}

/// Status report for one session.
#[must_use]
pub fn results_text(results: &Results, options: TableOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Session: {}", results.name);
    let _ = writeln!(out, "Status: {}", results.status);

    let mut runs = Table::new(["run", "query_id", "query", "status"]);
    for run in &results.runs {
        runs.push([
            run.id.to_string(),
            run.query_id.clone(),
            run.query.clone(),
            run.status.to_string(),
        ]);
    }
    let _ = writeln!(out, "{}", runs.render(options));
    for run in results.runs.iter().filter(|run| run.failure_reason.is_some()) {
        let reason = run.failure_reason.as_deref().unwrap_or_default();
        let _ = writeln!(out, "Run {} failed: {reason}", run.id);
    }

    let _ = writeln!(out, "Total findings: {}", results.total_findings_count);
    let _ = writeln!(
        out,
        "Repositories with findings: {}",
        results.total_repositories_with_findings
    );
    let _ = writeln!(
        out,
        "Successful scans: {}, failed scans: {}",
        results.total_successful_scans, results.total_failed_scans
    );
    let breakdown = SkipCategory::ALL
        .iter()
        .map(|category| format!("{}: {}", skip_label(*category), results.skipped(*category)))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        out,
        "Skipped repositories: {} ({breakdown})",
        results.total_skipped_repositories
    );

    if !results.repositories_with_findings.is_empty() {
        let mut findings = Table::new(["nwo", "query_id", "count", "stars", "run"]);
        for repo in &results.repositories_with_findings {
            findings.push([
                repo.nwo.clone(),
                repo.query_id.clone(),
                repo.count.to_string(),
                repo.stars.to_string(),
                repo.run_id.to_string(),
            ]);
        }
        let _ = write!(out, "\n{}", findings.render(options));
    }
    out.trim_end().to_string()
}

/// One row per stored session.
#[must_use]
pub fn sessions_text(sessions: &[Session], options: TableOptions) -> String {
    if sessions.is_empty() {
        return String::from("No sessions found");
    }
    let mut table = Table::new([
        "name",
        "created",
        "controller",
        "language",
        "list",
        "repositories",
        "runs",
    ]);
    for session in sessions {
        table.push([
            session.name.clone(),
            session.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            session.controller.clone(),
            session.language.clone(),
            format!("{} ({})", session.list, session.list_file),
            session.repository_count.to_string(),
            session.runs.len().to_string(),
        ]);
    }
    table.render(options)
}

/// Closing line of a download, plus any task failures.
#[must_use]
pub fn report_text(report: &RetrievalReport, options: TableOptions) -> String {
    let mut out = format!(
        "{} downloaded, {} already present, {} failed into {}",
        report.downloaded,
        report.already_present,
        report.failures.len(),
        report.output_dir.display()
    );
    if !report.failures.is_empty() {
        let mut table = Table::new(["nwo", "run", "kind", "reason"]);
        for failure in &report.failures {
            table.push([
                failure.nwo.clone(),
                failure.run_id.to_string(),
                failure.kind.to_string(),
                failure.reason.clone(),
            ]);
        }
        out.push_str("\n\n");
        out.push_str(&table.render(options));
    }
    out
}
