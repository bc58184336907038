//! The question/answer corpus.
//!
//! [`CorpusStore`] holds every [`QaRecord`] in insertion order, answers
//! lookups with a case-insensitive substring scan, and rewrites its backing
//! JSON file after each append.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::error::StoreResult;
use crate::persist;

/// Answer returned when no record matches a lookup.
pub const NO_ANSWER: &str = "Sorry, I could not find an answer to your question.";

/// A single question and its answer, filed under a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub subject: String,
    pub question: String,
    pub answer: String,
}

impl QaRecord {
    pub fn new(
        subject: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Whether this record matches already-lowercased `query` and `subject`.
    fn matches(&self, query: &str, subject: &str) -> bool {
        self.subject.to_lowercase().contains(subject) && self.question.to_lowercase().contains(query)
    }
}

/// Append-only, file-backed collection of [`QaRecord`]s.
#[derive(Clone)]
pub struct CorpusStore {
    path: PathBuf,
    records: Arc<RwLock<Vec<QaRecord>>>,
}

impl CorpusStore {
    /// Load the corpus from `path`. A missing file yields an empty corpus.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let load_path = path.clone();
        let records =
            tokio::task::spawn_blocking(move || persist::load_json_array::<QaRecord>(&load_path))
                .await??;

        info!(path = %path.display(), records = records.len(), "corpus loaded");
        Ok(Self {
            path,
            records: Arc::new(RwLock::new(records)),
        })
    }

    /// The backing file this corpus persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the answer of the first record whose subject contains `subject`
    /// and whose question contains `query`, both compared case-insensitively.
    ///
    /// Never fails: when nothing matches the result is [`NO_ANSWER`].
    #[instrument(skip(self))]
    pub async fn find_answer(&self, query: &str, subject: &str) -> String {
        let query = query.to_lowercase();
        let subject = subject.to_lowercase();

        let records = self.records.read().await;
        match records.iter().find(|r| r.matches(&query, &subject)) {
            Some(record) => {
                debug!("answer found");
                record.answer.clone()
            }
            None => {
                debug!("no matching record");
                NO_ANSWER.to_owned()
            }
        }
    }

    /// Append a record and rewrite the backing file.
    ///
    /// The file is rewritten first; the record only becomes visible to
    /// lookups once that succeeds.  A caller that stops waiting does not
    /// abort a write already in progress.
    #[instrument(skip(self, question, answer))]
    pub async fn add_record(&self, subject: &str, question: &str, answer: &str) -> StoreResult<()> {
        let record = QaRecord::new(subject, question, answer);
        let records = persist::append_persisted(
            Arc::clone(&self.records),
            self.path.clone(),
            record,
            |_| Ok(()),
        )
        .await?;

        info!(records, "question added");
        Ok(())
    }

    /// Snapshot of all records, optionally restricted to subjects containing
    /// `subject` (case-insensitive).
    pub async fn list(&self, subject: Option<&str>) -> Vec<QaRecord> {
        let records = self.records.read().await;
        match subject.map(str::to_lowercase) {
            Some(s) => records
                .iter()
                .filter(|r| r.subject.to_lowercase().contains(&s))
                .cloned()
                .collect(),
            None => records.clone(),
        }
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
