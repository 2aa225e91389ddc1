//! Correctness bands: mapping a similarity score to a fuzzy verdict.
//!
//! The exact cut-off numbers are tuned heuristics, not derived values,
//! so they live in configuration. The firm contract is ordering: easier
//! difficulties use more lenient thresholds, enforced by [`BandConfig::validate`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Difficulty;

/// A named bucket of similarity scores with a fixed score and verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectnessBand {
    /// Off by a character or two; treated as correct.
    NearExact,
    /// Recognizably the right answer with small mistakes; correct.
    CloseMatch,
    /// Clearly related but wrong enough to fail.
    PartialMatch,
    /// No fuzzy verdict; the dispatcher falls through to the semantic tier.
    BelowThreshold,
}

impl CorrectnessBand {
    /// The fixed score committed for this band.
    pub fn score(self) -> u8 {
        match self {
            CorrectnessBand::NearExact => 95,
            CorrectnessBand::CloseMatch => 85,
            CorrectnessBand::PartialMatch => 65,
            CorrectnessBand::BelowThreshold => 0,
        }
    }

    pub fn is_passing(self) -> bool {
        matches!(self, CorrectnessBand::NearExact | CorrectnessBand::CloseMatch)
    }

    /// Whether this band commits a verdict. `BelowThreshold` does not.
    pub fn commits(self) -> bool {
        !matches!(self, CorrectnessBand::BelowThreshold)
    }

    /// Human label used in feedback and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            CorrectnessBand::NearExact => "near-exact match, minor typo",
            CorrectnessBand::CloseMatch => "close match with small mistakes",
            CorrectnessBand::PartialMatch => "partial match, below passing",
            CorrectnessBand::BelowThreshold => "below threshold",
        }
    }
}

impl fmt::Display for CorrectnessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectnessBand::NearExact => write!(f, "near_exact"),
            CorrectnessBand::CloseMatch => write!(f, "close_match"),
            CorrectnessBand::PartialMatch => write!(f, "partial_match"),
            CorrectnessBand::BelowThreshold => write!(f, "below_threshold"),
        }
    }
}

/// Minimum similarity for each band at one difficulty level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandThresholds {
    pub near_exact: u8,
    pub close_match: u8,
    pub partial_match: u8,
}

/// Per-difficulty band thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub beginner: BandThresholds,
    pub intermediate: BandThresholds,
    pub advanced: BandThresholds,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            beginner: BandThresholds {
                near_exact: 85,
                close_match: 70,
                partial_match: 55,
            },
            intermediate: BandThresholds {
                near_exact: 90,
                close_match: 78,
                partial_match: 62,
            },
            advanced: BandThresholds {
                near_exact: 93,
                close_match: 84,
                partial_match: 70,
            },
        }
    }
}

impl BandConfig {
    pub fn thresholds(&self, difficulty: Difficulty) -> &BandThresholds {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Advanced => &self.advanced,
        }
    }

    /// Map a similarity score into a band for the given difficulty.
    pub fn classify(&self, similarity: u8, difficulty: Difficulty) -> CorrectnessBand {
        let t = self.thresholds(difficulty);
        if similarity >= t.near_exact {
            CorrectnessBand::NearExact
        } else if similarity >= t.close_match {
            CorrectnessBand::CloseMatch
        } else if similarity >= t.partial_match {
            CorrectnessBand::PartialMatch
        } else {
            CorrectnessBand::BelowThreshold
        }
    }

    /// Check both orderings: bands descend within a difficulty, and each
    /// band boundary is non-decreasing as difficulty rises.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, t) in [
            ("beginner", &self.beginner),
            ("intermediate", &self.intermediate),
            ("advanced", &self.advanced),
        ] {
            anyhow::ensure!(
                t.near_exact > t.close_match && t.close_match > t.partial_match,
                "band thresholds for {name} must strictly descend"
            );
            anyhow::ensure!(
                t.near_exact <= 100,
                "band thresholds for {name} must be at most 100"
            );
        }
        let pairs = [
            (&self.beginner, &self.intermediate, "beginner/intermediate"),
            (&self.intermediate, &self.advanced, "intermediate/advanced"),
        ];
        for (easier, stricter, which) in pairs {
            anyhow::ensure!(
                easier.near_exact <= stricter.near_exact
                    && easier.close_match <= stricter.close_match
                    && easier.partial_match <= stricter.partial_match,
                "stricter difficulty must not lower thresholds ({which})"
            );
        }
        Ok(())
    }
}
