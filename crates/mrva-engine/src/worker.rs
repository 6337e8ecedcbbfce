//! Execution of a single [`DownloadTask`].

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use mrva_client::AnalysisClient;
use mrva_core::{ArtifactKind, DownloadTask, PLACEHOLDER_QUERY_ID, RESULT_ENTRIES};
use serde::Serialize;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::TaskError;

/// How one task ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    Downloaded { files: Vec<PathBuf> },
    Failed { reason: String },
}

pub(crate) async fn run_task<C>(client: &C, task: &DownloadTask) -> TaskOutcome
where
    C: AnalysisClient + ?Sized,
{
    let result = match task.kind {
        ArtifactKind::Artifact => download_artifact(client, task).await,
        ArtifactKind::Database => download_database(client, task).await,
    };
    match result {
        Ok(files) => TaskOutcome::Downloaded { files },
        Err(error) => {
            tracing::warn!(
                nwo = %task.nwo,
                run_id = task.run_id,
                kind = %task.kind,
                %error,
                "download failed"
            );
            TaskOutcome::Failed {
                reason: error.to_string(),
            }
        }
    }
}

async fn download_artifact<C>(client: &C, task: &DownloadTask) -> Result<Vec<PathBuf>, TaskError>
where
    C: AnalysisClient + ?Sized,
{
    let location = client
        .run_repository_detail(&task.controller, task.run_id, &task.nwo)
        .await?;
    let url = location
        .artifact_url
        .filter(|url| !url.is_empty())
        .ok_or(TaskError::MissingArtifactUrl)?;
    let archive = client.fetch_blob(&url).await?;

    let mut written = Vec::new();
    for (extension, contents) in extract_results(archive, &task.query_id)? {
        let path = task.result_path(extension);
        write(&path, &contents).await?;
        written.push(path);
    }
    Ok(written)
}

async fn download_database<C>(client: &C, task: &DownloadTask) -> Result<Vec<PathBuf>, TaskError>
where
    C: AnalysisClient + ?Sized,
{
    let bytes = client.fetch_database(&task.nwo, &task.language).await?;
    let path = task.database_path();
    write(&path, &bytes).await?;
    Ok(vec![path])
}

/// Result entries present in `archive`, relabelled with `query_id`, keyed by
/// file extension.
fn extract_results(
    archive: Vec<u8>,
    query_id: &str,
) -> Result<Vec<(&'static str, Vec<u8>)>, TaskError> {
    let mut archive = ZipArchive::new(Cursor::new(archive))?;
    let mut found = Vec::new();
    for (entry, extension) in RESULT_ENTRIES {
        let mut file = match archive.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => continue,
            Err(error) => return Err(error.into()),
        };
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|source| TaskError::Io {
            path: PathBuf::from(entry),
            source,
        })?;
        found.push((extension, relabel(&contents, query_id)));
    }
    if found.is_empty() {
        return Err(TaskError::NoResultEntries);
    }
    Ok(found)
}

/// Replace every placeholder query id in `contents` with `query_id`.
fn relabel(contents: &[u8], query_id: &str) -> Vec<u8> {
    let needle = PLACEHOLDER_QUERY_ID.as_bytes();
    if query_id.is_empty() {
        return contents.to_vec();
    }
    let mut out = Vec::with_capacity(contents.len());
    let mut rest = contents;
    while let Some(pos) = rest.windows(needle.len()).position(|window| window == needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(query_id.as_bytes());
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}

async fn write(path: &Path, contents: &[u8]) -> Result<(), TaskError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| TaskError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn relabel_replaces_every_placeholder() {
        let out = relabel(br#"{"ruleId":"remote-query","id":"remote-query"}"#, "java/sqli");
        assert_eq!(out, br#"{"ruleId":"java/sqli","id":"java/sqli"}"#.to_vec());
    }

    #[test]
    fn relabel_without_query_id_is_identity() {
        assert_eq!(relabel(b"remote-query", ""), b"remote-query".to_vec());
    }

    #[test]
    fn extracts_both_entries_and_ignores_others() {
        let bytes = archive(&[
            ("results.sarif", "sarif remote-query"),
            ("results.bqrs", "bqrs"),
            ("extra.txt", "noise"),
        ]);
        let found = extract_results(bytes, "go/q").unwrap();
        assert_eq!(
            found,
            vec![
                ("sarif", b"sarif go/q".to_vec()),
                ("bqrs", b"bqrs".to_vec()),
            ]
        );
    }

    #[test]
    fn single_entry_is_enough() {
        let found = extract_results(archive(&[("results.bqrs", "x")]), "q").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "bqrs");
    }

    #[test]
    fn archive_without_results_fails() {
        let err = extract_results(archive(&[("other.json", "{}")]), "q").unwrap_err();
        assert!(matches!(err, TaskError::NoResultEntries));
    }

    #[test]
    fn garbage_is_archive_error() {
        let err = extract_results(b"not a zip".to_vec(), "q").unwrap_err();
        assert!(matches!(err, TaskError::Archive(_)));
    }
}
