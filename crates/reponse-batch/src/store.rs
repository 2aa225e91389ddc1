//! The question store seam.
//!
//! Real deployments back this with their own database; the crate ships
//! an in-memory store for tests and a JSON-file store so the CLI can
//! run against an exported question dump.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use reponse_core::model::Difficulty;

/// One stored practice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub reference_answer: Option<String>,
    pub difficulty: Difficulty,
}

/// Paginated access to the question store.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Fetch up to `limit` questions starting at `offset`.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<StoredQuestion>>;

    /// Persist a new difficulty label for one question.
    async fn update_difficulty(&self, id: &str, difficulty: Difficulty) -> Result<()>;
}

/// In-memory store, used by tests and as a reference implementation.
pub struct MemoryStore {
    questions: Mutex<Vec<StoredQuestion>>,
}

impl MemoryStore {
    pub fn new(questions: Vec<StoredQuestion>) -> Self {
        Self {
            questions: Mutex::new(questions),
        }
    }

    pub fn snapshot(&self) -> Vec<StoredQuestion> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<StoredQuestion>> {
        let questions = self.questions.lock().unwrap();
        Ok(questions.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn update_difficulty(&self, id: &str, difficulty: Difficulty) -> Result<()> {
        let mut questions = self.questions.lock().unwrap();
        let question = questions
            .iter_mut()
            .find(|q| q.id == id)
            .with_context(|| format!("question not found: {id}"))?;
        question.difficulty = difficulty;
        Ok(())
    }
}

/// Store backed by a JSON array file; every update rewrites the file so
/// an interrupted run leaves consistent state behind.
pub struct JsonFileStore {
    path: PathBuf,
    questions: Mutex<Vec<StoredQuestion>>,
}

impl JsonFileStore {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question file: {}", path.display()))?;
        let questions: Vec<StoredQuestion> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse question file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            questions: Mutex::new(questions),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, questions: &[StoredQuestion]) -> Result<()> {
        let json = serde_json::to_string_pretty(questions)
            .context("failed to serialize question file")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write question file: {}", self.path.display()))
    }
}

#[async_trait]
impl QuestionStore for JsonFileStore {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<StoredQuestion>> {
        let questions = self.questions.lock().unwrap();
        Ok(questions.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn update_difficulty(&self, id: &str, difficulty: Difficulty) -> Result<()> {
        let mut questions = self.questions.lock().unwrap();
        let question = questions
            .iter_mut()
            .find(|q| q.id == id)
            .with_context(|| format!("question not found: {id}"))?;
        question.difficulty = difficulty;
        self.persist(&questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, difficulty: Difficulty) -> StoredQuestion {
        StoredQuestion {
            id: id.into(),
            question: format!("question {id}"),
            reference_answer: None,
            difficulty,
        }
    }

    #[tokio::test]
    async fn memory_store_pagination() {
        let store = MemoryStore::new(
            (0..5)
                .map(|i| question(&format!("q{i}"), Difficulty::Beginner))
                .collect(),
        );
        let page = store.fetch_page(0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        let page = store.fetch_page(4, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        let page = store.fetch_page(10, 2).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn memory_store_update() {
        let store = MemoryStore::new(vec![question("q1", Difficulty::Beginner)]);
        store
            .update_difficulty("q1", Difficulty::Advanced)
            .await
            .unwrap();
        assert_eq!(store.snapshot()[0].difficulty, Difficulty::Advanced);
        assert!(store
            .update_difficulty("missing", Difficulty::Beginner)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn json_store_roundtrip_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        let questions = vec![
            question("q1", Difficulty::Beginner),
            question("q2", Difficulty::Intermediate),
        ];
        std::fs::write(&path, serde_json::to_string(&questions).unwrap()).unwrap();

        let store = JsonFileStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);

        store
            .update_difficulty("q1", Difficulty::Advanced)
            .await
            .unwrap();

        // The change survives a reload.
        let reloaded = JsonFileStore::load(&path).unwrap();
        let page = reloaded.fetch_page(0, 10).await.unwrap();
        assert_eq!(page[0].difficulty, Difficulty::Advanced);
        assert_eq!(page[1].difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn stored_question_wire_shape() {
        let json = r#"{
            "id": "q1",
            "question": "Translate: cat",
            "referenceAnswer": "chat",
            "difficulty": "beginner"
        }"#;
        let q: StoredQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.reference_answer.as_deref(), Some("chat"));
        assert_eq!(q.difficulty, Difficulty::Beginner);
    }
}
