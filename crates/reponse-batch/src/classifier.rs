//! The batch reclassifier.
//!
//! Walks the whole question store page by page, asks the external rater
//! for a fresh difficulty label per question, and applies the changes.
//! Questions are rated in fixed-size batches; each batch runs its items
//! concurrently but the next batch does not start until the previous
//! one has fully settled, keeping pressure on the rater bounded and the
//! progress feed monotonic.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use reponse_core::model::Difficulty;
use reponse_core::traits::DifficultyRater;

use crate::confusion::ConfusionMatrix;
use crate::store::{QuestionStore, StoredQuestion};

/// Paging and per-batch concurrency for a reclassification run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Questions fetched from the store per page.
    pub page_size: usize,
    /// Questions rated concurrently before the run pauses to settle.
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            batch_size: 10,
        }
    }
}

/// Progress callback, invoked after every settled batch.
pub trait BatchProgress: Send + Sync {
    fn on_batch(&self, processed: usize, total: usize, changed: usize, unchanged: usize, errors: usize);
}

/// Progress sink that discards all updates.
pub struct NoopProgress;

impl BatchProgress for NoopProgress {
    fn on_batch(&self, _: usize, _: usize, _: usize, _: usize, _: usize) {}
}

/// Map a free-form rater reply onto a difficulty label.
///
/// The rater is prompted for a single word but replies like
/// "Intermediate." or "This question is advanced" still occur, so the
/// match is a case-insensitive substring scan. Checked in order of
/// specificity so "intermediate" never matches a stray "inter".
pub fn normalize_label(reply: &str) -> Option<Difficulty> {
    let lowered = reply.to_lowercase();
    if lowered.contains("intermediate") {
        Some(Difficulty::Intermediate)
    } else if lowered.contains("advanced") {
        Some(Difficulty::Advanced)
    } else if lowered.contains("beginner") {
        Some(Difficulty::Beginner)
    } else {
        None
    }
}

/// Result of one full reclassification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub errors: usize,
    pub matrix: ConfusionMatrix,
    /// Questions per assigned difficulty, beginner first.
    pub distribution: [u64; 3],
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report: {}", path.display()))
    }
}

enum ItemOutcome {
    Changed(Difficulty, Difficulty),
    Unchanged(Difficulty),
    /// Rating was accepted but the store rejected the update.
    StoreFailed(Difficulty, Difficulty),
    Error,
}

/// Reclassifies every stored question through a [`DifficultyRater`].
pub struct BatchClassifier {
    rater: Arc<dyn DifficultyRater>,
    store: Arc<dyn QuestionStore>,
    config: BatchConfig,
}

impl BatchClassifier {
    pub fn new(
        rater: Arc<dyn DifficultyRater>,
        store: Arc<dyn QuestionStore>,
        config: BatchConfig,
    ) -> Self {
        Self {
            rater,
            store,
            config,
        }
    }

    /// Run the full reclassification and assemble a report.
    ///
    /// Per-item failures never abort the run; they are tallied as
    /// errors and the run continues.
    pub async fn run(&self, progress: &dyn BatchProgress) -> Result<BatchReport> {
        let started = Instant::now();
        let questions = self.fetch_all().await?;
        let total = questions.len();
        info!(total, "starting difficulty reclassification");

        let mut matrix = ConfusionMatrix::new();
        let mut changed = 0usize;
        let mut unchanged = 0usize;
        let mut errors = 0usize;
        let mut processed = 0usize;

        for batch in questions.chunks(self.config.batch_size) {
            let outcomes =
                futures::future::join_all(batch.iter().map(|q| self.classify_one(q))).await;

            for outcome in outcomes {
                match outcome {
                    ItemOutcome::Changed(original, assigned) => {
                        changed += 1;
                        matrix.record(original, assigned);
                    }
                    ItemOutcome::Unchanged(original) => {
                        unchanged += 1;
                        matrix.record(original, original);
                    }
                    ItemOutcome::StoreFailed(original, assigned) => {
                        // The rating itself was accepted, so it still
                        // belongs in the matrix.
                        errors += 1;
                        matrix.record(original, assigned);
                    }
                    ItemOutcome::Error => errors += 1,
                }
            }

            processed += batch.len();
            progress.on_batch(processed, total, changed, unchanged, errors);
        }

        let report = BatchReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total,
            changed,
            unchanged,
            errors,
            matrix: matrix.clone(),
            distribution: [
                matrix.column_sum(Difficulty::Beginner),
                matrix.column_sum(Difficulty::Intermediate),
                matrix.column_sum(Difficulty::Advanced),
            ],
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            changed = report.changed,
            unchanged = report.unchanged,
            errors = report.errors,
            duration_ms = report.duration_ms,
            "reclassification complete"
        );
        Ok(report)
    }

    async fn fetch_all(&self) -> Result<Vec<StoredQuestion>> {
        let mut questions = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .store
                .fetch_page(offset, self.config.page_size)
                .await
                .context("failed to fetch question page")?;
            if page.is_empty() {
                break;
            }
            offset += page.len();
            questions.extend(page);
        }
        Ok(questions)
    }

    async fn classify_one(&self, question: &StoredQuestion) -> ItemOutcome {
        let reply = match self
            .rater
            .rate_difficulty(&question.question, question.reference_answer.as_deref())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(id = %question.id, error = %err, "rater call failed");
                return ItemOutcome::Error;
            }
        };

        let Some(assigned) = normalize_label(&reply) else {
            warn!(id = %question.id, reply = %reply, "unrecognized difficulty label");
            return ItemOutcome::Error;
        };

        if assigned == question.difficulty {
            debug!(id = %question.id, difficulty = %assigned, "difficulty unchanged");
            return ItemOutcome::Unchanged(assigned);
        }

        match self.store.update_difficulty(&question.id, assigned).await {
            Ok(()) => {
                debug!(
                    id = %question.id,
                    from = %question.difficulty,
                    to = %assigned,
                    "difficulty updated"
                );
                ItemOutcome::Changed(question.difficulty, assigned)
            }
            Err(err) => {
                warn!(id = %question.id, error = %err, "store update failed");
                ItemOutcome::StoreFailed(question.difficulty, assigned)
            }
        }
    }
}
