use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{Result, StorageError};

use super::participant::{Gender, Participant};

/// Running totals over a set of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RunTotals {
    pub number_of_runs: i32,
    pub total_points: i32,
    pub total_penalty: i32,
    pub total_chrono_sec: i32,
}

impl RunTotals {
    pub fn single(points: i32, penalty: i32, chrono_sec: i32) -> Self {
        Self {
            number_of_runs: 1,
            total_points: points,
            total_penalty: penalty,
            total_chrono_sec: chrono_sec,
        }
    }

    /// Field-wise sum. Fails instead of wrapping when a total leaves the
    /// `i32` column range.
    pub fn checked_add(&self, other: &RunTotals) -> Result<RunTotals> {
        let sum = |field: &str, a: i32, b: i32| {
            a.checked_add(b).ok_or_else(|| {
                StorageError::InvalidInput(format!("{field} exceeds the supported range"))
            })
        };
        Ok(Self {
            number_of_runs: sum("number of runs", self.number_of_runs, other.number_of_runs)?,
            total_points: sum("total points", self.total_points, other.total_points)?,
            total_penalty: sum("total penalty", self.total_penalty, other.total_penalty)?,
            total_chrono_sec: sum(
                "total chrono",
                self.total_chrono_sec,
                other.total_chrono_sec,
            )?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_runs == 0
    }
}

/// One standings row. Participant identity is copied in when the entry
/// is written and is not kept in sync with later participant edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LiverankingEntry {
    pub competition_id: i32,
    pub dossard_number: i32,
    pub first_name: String,
    pub last_name: String,
    pub category: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub totals: RunTotals,
}

impl LiverankingEntry {
    pub fn new(participant: &Participant, totals: RunTotals) -> Self {
        Self {
            competition_id: participant.competition_id,
            dossard_number: participant.dossard_number,
            first_name: participant.first_name.clone(),
            last_name: participant.last_name.clone(),
            category: participant.category.clone(),
            gender: participant.gender,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_add_field_by_field() {
        let sum = RunTotals::single(10, 1, 30)
            .checked_add(&RunTotals::single(5, 0, 45))
            .unwrap();
        assert_eq!(
            sum,
            RunTotals {
                number_of_runs: 2,
                total_points: 15,
                total_penalty: 1,
                total_chrono_sec: 75,
            }
        );
    }

    #[test]
    fn totals_beyond_i32_are_rejected() {
        let slow = RunTotals::single(0, 0, i32::MAX);
        let result = slow.checked_add(&RunTotals::single(0, 0, 1));
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }
}
