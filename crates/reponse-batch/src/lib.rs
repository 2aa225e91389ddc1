//! reponse-batch — Batch difficulty reclassification.
//!
//! Re-labels every stored question's difficulty through the external
//! rater, with bounded concurrency, per-item failure isolation, and a
//! confusion-matrix report of what moved where.

pub mod classifier;
pub mod confusion;
pub mod store;

pub use classifier::{
    normalize_label, BatchClassifier, BatchConfig, BatchProgress, BatchReport, NoopProgress,
};
pub use confusion::ConfusionMatrix;
pub use store::{JsonFileStore, MemoryStore, QuestionStore, StoredQuestion};
