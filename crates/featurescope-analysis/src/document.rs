//! Documents and the provider seam through which they are read

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Source text handed to the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full text
    pub text: String,
    /// Editor language id (`css`, `typescript`, ...), may be empty
    pub language_id: String,
    /// File name used in reports and locations
    pub file_name: String,
}

impl Document {
    /// Create a document
    pub fn new(
        file_name: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            language_id: language_id.into(),
            file_name: file_name.into(),
        }
    }

    /// Language id, or `None` when not supplied
    pub fn language(&self) -> Option<&str> {
        let id = self.language_id.trim();
        (!id.is_empty()).then_some(id)
    }
}

/// Reads documents on behalf of the analyzer.
///
/// The analyzer never touches the filesystem; hosts implement this over their
/// editor buffers, a virtual filesystem or disk.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Load one file from the enumerated scope
    async fn open(&self, file: &str) -> Result<Document>;
}

/// Provider serving documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocuments {
    documents: Vec<Document>,
}

impl InMemoryDocuments {
    /// Provider over the given documents
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// File names in insertion order
    pub fn file_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.file_name.clone()).collect()
    }
}

#[async_trait]
impl DocumentProvider for InMemoryDocuments {
    async fn open(&self, file: &str) -> Result<Document> {
        self.documents
            .iter()
            .find(|d| d.file_name == file)
            .cloned()
            .ok_or_else(|| AnalysisError::document(file, "document not found"))
    }
}

/// The files to analyze, as enumerated by the host.
///
/// Extension filters, ignore globs and file caps are applied before the scope
/// reaches the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceScope {
    /// Workspace root folders, used as the cache key
    pub roots: Vec<String>,
    /// Files to analyze
    pub files: Vec<String>,
}

impl WorkspaceScope {
    /// Scope over the given roots and files
    pub fn new<R, F>(roots: R, files: F) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Order-independent key for the set of roots
    pub fn cache_key(&self) -> String {
        let roots: BTreeSet<&str> = self.roots.iter().map(String::as_str).collect();
        roots.into_iter().collect::<Vec<_>>().join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_ignores_root_order() {
        let a = WorkspaceScope::new(["/b", "/a"], Vec::<String>::new());
        let b = WorkspaceScope::new(["/a", "/b", "/a"], Vec::<String>::new());
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "/a|/b");
    }

    #[test]
    fn test_language_blank_is_none() {
        assert_eq!(Document::new("a.css", "css", "").language(), Some("css"));
        assert_eq!(Document::new("a.txt", "  ", "").language(), None);
    }

    #[tokio::test]
    async fn test_in_memory_provider() {
        let provider = InMemoryDocuments::new(vec![Document::new("a.css", "css", "x")]);
        assert_eq!(provider.open("a.css").await.unwrap().text, "x");
        assert!(matches!(
            provider.open("missing.css").await,
            Err(AnalysisError::Document { .. })
        ));
        assert_eq!(provider.file_names(), vec!["a.css".to_string()]);
    }
}
