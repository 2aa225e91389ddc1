//! Confusion matrix for reclassification runs.

use serde::{Deserialize, Serialize};

use reponse_core::model::Difficulty;

/// 3x3 tally of original difficulty against newly assigned difficulty.
///
/// Rows are the original label, columns the assigned one, both in the
/// order beginner, intermediate, advanced. The diagonal counts
/// questions whose label did not move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    cells: [[u64; 3]; 3],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one accepted classification.
    pub fn record(&mut self, original: Difficulty, assigned: Difficulty) {
        self.cells[original.index()][assigned.index()] += 1;
    }

    pub fn get(&self, original: Difficulty, assigned: Difficulty) -> u64 {
        self.cells[original.index()][assigned.index()]
    }

    /// Accepted classifications for questions originally labeled `original`.
    pub fn row_sum(&self, original: Difficulty) -> u64 {
        self.cells[original.index()].iter().sum()
    }

    /// Questions assigned `assigned`, regardless of where they started.
    pub fn column_sum(&self, assigned: Difficulty) -> u64 {
        self.cells.iter().map(|row| row[assigned.index()]).sum()
    }

    /// Total accepted classifications.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// Classifications where the label moved.
    pub fn off_diagonal(&self) -> u64 {
        let mut sum = 0;
        for (i, row) in self.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if i != j {
                    sum += cell;
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix() {
        let matrix = ConfusionMatrix::new();
        assert_eq!(matrix.total(), 0);
        assert_eq!(matrix.row_sum(Difficulty::Beginner), 0);
    }

    #[test]
    fn record_and_sums() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Difficulty::Beginner, Difficulty::Beginner);
        matrix.record(Difficulty::Beginner, Difficulty::Intermediate);
        matrix.record(Difficulty::Intermediate, Difficulty::Intermediate);
        matrix.record(Difficulty::Advanced, Difficulty::Intermediate);

        assert_eq!(matrix.get(Difficulty::Beginner, Difficulty::Intermediate), 1);
        assert_eq!(matrix.row_sum(Difficulty::Beginner), 2);
        assert_eq!(matrix.column_sum(Difficulty::Intermediate), 3);
        assert_eq!(matrix.total(), 4);
        assert_eq!(matrix.off_diagonal(), 2);
    }

    #[test]
    fn serde_roundtrip() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Difficulty::Advanced, Difficulty::Beginner);
        let json = serde_json::to_string(&matrix).unwrap();
        let back: ConfusionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);
    }
}
