//! File-backed fact store.
//!
//! Each document is a JSON-lines file: a header line naming the document,
//! then one fact per line. Files are named by a name-based UUID of the
//! document identifier, which keeps names short for any identifier length.
//! Documents are replaced through a temp file and a rename, so readers see
//! either the old or the new contents.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::{swap_in_place, AllocResult, AllocatorError, Fact, FactSet, FactStore};

const EXTENSION: &str = "jsonl";

/// First line of every document file.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentHeader {
    document: String,
}

/// Fact store persisting documents under a root directory.
///
/// Mutations are serialized by a store-wide lock, which also makes
/// `compare_and_swap` atomic within this process. Separate processes sharing
/// a directory are not coordinated.
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> AllocResult<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers of every stored document, sorted.
    pub async fn documents(&self) -> AllocResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                // Deleted between listing and reading.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if let Some((header, _)) = parse_document(&text)? {
                names.push(header.document);
            }
        }
        names.sort();
        Ok(names)
    }

    fn file_path(&self, document: &str) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", file_stem(document)))
    }

    async fn read_document(&self, document: &str) -> AllocResult<Option<FactSet>> {
        let text = match tokio::fs::read_to_string(self.file_path(document)).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match parse_document(&text)? {
            Some((header, facts)) if header.document == document => Ok(Some(facts)),
            Some((header, _)) => Err(AllocatorError::Store(format!(
                "file for {document} holds {}",
                header.document
            ))),
            None => Err(AllocatorError::Store(format!("file for {document} has no header"))),
        }
    }

    async fn write_document(&self, document: &str, facts: &FactSet) -> AllocResult<()> {
        let header = DocumentHeader {
            document: document.to_string(),
        };
        let mut body = serde_json::to_string(&header)?;
        body.push('\n');
        for fact in facts {
            body.push_str(&serde_json::to_string(fact)?);
            body.push('\n');
        }

        let path = self.file_path(document);
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl FactStore for FileStore {
    async fn match_facts(
        &self,
        document: &str,
        subject: Option<&str>,
        predicate: &str,
        object: Option<&str>,
    ) -> AllocResult<Option<FactSet>> {
        Ok(self
            .read_document(document)
            .await?
            .map(|facts| facts.matching(subject, Some(predicate), object)))
    }

    async fn graph(&self, document: &str) -> AllocResult<FactSet> {
        Ok(self.read_document(document).await?.unwrap_or_default())
    }

    async fn add(&self, document: &str, facts: FactSet) -> AllocResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_document(document, &facts).await
    }

    async fn merge(&self, document: &str, facts: FactSet) -> AllocResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut current = self.read_document(document).await?.unwrap_or_default();
        current.add_all(&facts);
        self.write_document(document, &current).await
    }

    async fn delete(&self, document: &str) -> AllocResult<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.file_path(document)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(AllocatorError::Io(e)),
            _ => Ok(()),
        }
    }

    async fn compare_and_swap(
        &self,
        document: &str,
        subject: &str,
        predicate: &str,
        expected: &str,
        replacement: &str,
    ) -> AllocResult<bool> {
        let _guard = self.write_lock.lock().await;
        let Some(mut facts) = self.read_document(document).await? else {
            return Ok(false);
        };
        if !swap_in_place(&mut facts, subject, predicate, expected, replacement) {
            return Ok(false);
        }
        self.write_document(document, &facts).await?;
        Ok(true)
    }
}

fn file_stem(document: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, document.as_bytes())
        .simple()
        .to_string()
}

/// Split a document file into its header and facts; `None` for an empty file.
fn parse_document(text: &str) -> AllocResult<Option<(DocumentHeader, FactSet)>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    let header: DocumentHeader = serde_json::from_str(first)?;

    let mut facts = FactSet::new();
    for line in lines {
        let fact: Fact = serde_json::from_str(line)?;
        facts.add(fact);
    }
    Ok(Some((header, facts)))
}
