//! Loading message corpora exported by the message store.
//!
//! A corpus file is either a JSON array of messages or one JSON message per
//! line. Blank lines in JSON-lines files are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::EmailMessage;

/// Errors that can occur while loading a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid message in {path} at line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("training fraction must be within (0, 1), got {0}")]
    InvalidSplit(f64),
}

/// Result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Reads a corpus file.
pub fn load(path: &Path) -> Result<Vec<EmailMessage>> {
    let raw = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let messages = parse(&raw).map_err(|(line, source)| CorpusError::Parse {
        path: path.to_path_buf(),
        line,
        source,
    })?;
    tracing::debug!(path = %path.display(), messages = messages.len(), "corpus loaded");
    Ok(messages)
}

fn parse(raw: &str) -> std::result::Result<Vec<EmailMessage>, (usize, serde_json::Error)> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| (e.line(), e));
    }
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| serde_json::from_str(line).map_err(|e| (index + 1, e)))
        .collect()
}

/// Splits a corpus into training and test sets, oldest messages first.
///
/// Undated messages keep their input order ahead of dated ones. The training
/// set receives `fraction` of the messages, rounded down.
pub fn split(
    mut messages: Vec<EmailMessage>,
    fraction: f64,
) -> Result<(Vec<EmailMessage>, Vec<EmailMessage>)> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(CorpusError::InvalidSplit(fraction));
    }
    // Stable sort: None orders before Some, equal dates keep input order.
    messages.sort_by_key(|m| m.date);

    let cut = (messages.len() as f64 * fraction).floor() as usize;
    let test = messages.split_off(cut);
    Ok((messages, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    #[test]
    fn loads_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"from": "a@x.com", "is_read": true}}, {{"from": "b@x.com"}}]"#
        )
        .unwrap();

        let messages = load(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_read);
        assert_eq!(messages[1].from, "b@x.com");
    }

    #[test]
    fn loads_json_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"from": "a@x.com"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"from": "b@x.com", "last_action": "replied"}}"#).unwrap();

        let messages = load(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn null_headers_do_not_abort_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"from": "a@x.com", "to": "me@x.com", "cc": null}}"#).unwrap();
        writeln!(file, r#"{{"from": "b@x.com", "to": null}}"#).unwrap();

        let messages = load(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].cc.is_empty());
        assert!(messages[1].to.is_empty());
    }

    #[test]
    fn reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"from": "a@x.com"}}"#).unwrap();
        writeln!(file, "oops").unwrap();

        match load(file.path()) {
            Err(CorpusError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("nope.json")),
            Err(CorpusError::Io { .. })
        ));
    }

    #[test]
    fn split_is_chronological() {
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let messages = vec![
            EmailMessage::new("late@x.com").dated(day(9)),
            EmailMessage::new("undated@x.com"),
            EmailMessage::new("early@x.com").dated(day(1)),
            EmailMessage::new("mid@x.com").dated(day(5)),
        ];

        let (train, test) = split(messages, 0.5).unwrap();
        let froms = |v: &[EmailMessage]| v.iter().map(|m| m.from.clone()).collect::<Vec<_>>();
        assert_eq!(froms(&train), vec!["undated@x.com", "early@x.com"]);
        assert_eq!(froms(&test), vec!["mid@x.com", "late@x.com"]);
    }

    #[test]
    fn split_rejects_degenerate_fraction() {
        assert!(matches!(
            split(Vec::new(), 1.0),
            Err(CorpusError::InvalidSplit(_))
        ));
        assert!(split(Vec::new(), 0.0).is_err());
    }
}
