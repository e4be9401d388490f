//! Development backend: newline-delimited JSON file
//!
//! Each append writes one complete line with a single write call, preceded
//! by a newline when the file ends in a partial line. Concurrent
//! writers are not coordinated; lines from separate processes may interleave.

use async_trait::async_trait;
use chrono::Utc;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

use super::ResponseStore;
use crate::models::{NewResponse, ResponseRecord};
use crate::{Error, Result};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse file content, skipping blank and malformed lines
///
/// Returns the parsed records (file order) and the number of lines skipped.
pub fn parse_lines(content: &str) -> (Vec<ResponseRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ResponseRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(line = index + 1, "Skipping malformed response line: {}", e);
            }
        }
    }

    (records, skipped)
}

/// True when the file is non-empty and its last byte is not a newline
async fn ends_mid_line(file: &mut tokio::fs::File) -> std::io::Result<bool> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] != b'\n')
}

#[async_trait]
impl ResponseStore for FileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn append(&self, response: &NewResponse) -> Result<ResponseRecord> {
        let record = response.to_record(None, Utc::now());
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Create {} failed: {}", parent.display(), e))
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::Storage(format!("Open {} failed: {}", self.path.display(), e)))?;

        // A torn earlier write leaves an unterminated line; start on a fresh one
        if ends_mid_line(&mut file)
            .await
            .map_err(|e| Error::Storage(format!("Read {} failed: {}", self.path.display(), e)))?
        {
            warn!(path = %self.path.display(), "Terminating partial trailing line before append");
            line.insert(0, '\n');
        }

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Error::Storage(format!("Append to {} failed: {}", self.path.display(), e)))?;
        file.flush()
            .await
            .map_err(|e| Error::Storage(format!("Flush {} failed: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "Appended response");
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<ResponseRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // Nothing submitted yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Read {} failed: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let (records, skipped) = parse_lines(&content);
        if skipped > 0 {
            warn!(
                "Skipped {} malformed line(s) in {}",
                skipped,
                self.path.display()
            );
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBracket, Answer, Gender, Language};

    fn response(name: &str) -> NewResponse {
        NewResponse {
            language: Language::English,
            name: name.to_string(),
            state: "Osun".to_string(),
            lga: "Ede North".to_string(),
            ward: "Ward 1".to_string(),
            age: AgeBracket::From18To24,
            gender: Gender::Female,
            knows_romeo: Answer::Yes,
            knows_muyideen: Answer::No,
            knows_abdulrasheed: Answer::Yes,
            heard_savewell: Answer::No,
            residence: "45 Side Rd".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_parse_lines_skips_malformed() {
        let good = serde_json::to_string(&response("Ada").to_record(None, Utc::now())).unwrap();
        let content = format!("{}\nnot json\n\n{{\"name\":\"missing fields\"}}\n{}\n", good, good);

        let (records, skipped) = parse_lines(&content);
        assert_eq!(records.len(), 2);
        assert_eq!(skipped, 2);
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("responses.json"));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("responses.json"));
        store.append(&response("Ada")).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_lists_in_append_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("responses.json"));

        for name in ["first", "second", "third"] {
            store.append(&response(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_appended_record_has_timestamp_but_no_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("responses.json"));

        let stored = store.append(&response("Ada")).await.unwrap();
        assert!(stored.id.is_none());
        assert!(stored.created_at.is_some());

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[tokio::test]
    async fn test_unreadable_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file
        let store = FileStore::new(dir.path());
        let err = store.list_all().await.unwrap_err();
        assert!(err.is_storage());
    }
}
