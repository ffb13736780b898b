//! Knobs that pin down behaviour which differs between the live standings
//! and the results export.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::StorageError;
use crate::models::RunTotals;

/// Direction used for the elapsed-time tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChronoOrder {
    Ascending,
    Descending,
}

impl ChronoOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    pub fn compare(&self, a: i32, b: i32) -> Ordering {
        match self {
            Self::Ascending => a.cmp(&b),
            Self::Descending => b.cmp(&a),
        }
    }
}

impl FromStr for ChronoOrder {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(StorageError::InvalidInput(format!(
                "chrono order must be 'asc' or 'desc', got '{other}'"
            ))),
        }
    }
}

/// What to do with a run whose zone has no scale for the participant's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingScalePolicy {
    /// Fail with `ScaleNotFound`.
    Reject,
    /// Leave the run out of the point sum.
    Skip,
}

impl FromStr for MissingScalePolicy {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "error" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            other => Err(StorageError::InvalidInput(format!(
                "missing scale policy must be 'reject' or 'skip', got '{other}'"
            ))),
        }
    }
}

/// Sort order of the live standings: points DESC, penalty ASC, then
/// elapsed time in the configured direction, then dossard ASC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiverankingOrdering {
    pub chrono: ChronoOrder,
}

impl Default for LiverankingOrdering {
    fn default() -> Self {
        Self {
            chrono: ChronoOrder::Descending,
        }
    }
}

impl LiverankingOrdering {
    pub fn compare(&self, a: (&RunTotals, i32), b: (&RunTotals, i32)) -> Ordering {
        let (ta, dossard_a) = a;
        let (tb, dossard_b) = b;
        tb.total_points
            .cmp(&ta.total_points)
            .then(ta.total_penalty.cmp(&tb.total_penalty))
            .then(self.chrono.compare(ta.total_chrono_sec, tb.total_chrono_sec))
            .then(dossard_a.cmp(&dossard_b))
    }

    /// `ORDER BY` body for a query aliasing the liveranking table as `l`.
    pub fn order_by_clause(&self) -> String {
        format!(
            "l.total_points DESC, l.total_penalty ASC, l.total_chrono_sec {}, l.dossard_number ASC",
            self.chrono.as_sql()
        )
    }
}

/// Sort order of rows within an exported sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOrdering {
    pub chrono: ChronoOrder,
}

impl Default for ExportOrdering {
    fn default() -> Self {
        Self {
            chrono: ChronoOrder::Ascending,
        }
    }
}

impl ExportOrdering {
    /// Rows flagged as errors always sort after valid rows.
    pub fn compare(&self, a: (bool, &RunTotals, i32), b: (bool, &RunTotals, i32)) -> Ordering {
        let (error_a, ta, dossard_a) = a;
        let (error_b, tb, dossard_b) = b;
        match (error_a, error_b) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => return dossard_a.cmp(&dossard_b),
            (false, false) => {}
        }
        tb.total_points
            .cmp(&ta.total_points)
            .then(ta.total_penalty.cmp(&tb.total_penalty))
            .then(self.chrono.compare(ta.total_chrono_sec, tb.total_chrono_sec))
            .then(dossard_a.cmp(&dossard_b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    /// Add a new run's totals onto the stored entry instead of recomputing
    /// the entry from the run ledger.
    pub incremental_liveranking: bool,
    pub live_ordering: LiverankingOrdering,
    pub export_ordering: ExportOrdering,
    pub live_missing_scale: MissingScalePolicy,
    pub recompute_missing_scale: MissingScalePolicy,
    pub export_missing_scale: MissingScalePolicy,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            incremental_liveranking: false,
            live_ordering: LiverankingOrdering::default(),
            export_ordering: ExportOrdering::default(),
            live_missing_scale: MissingScalePolicy::Reject,
            recompute_missing_scale: MissingScalePolicy::Skip,
            export_missing_scale: MissingScalePolicy::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(points: i32, penalty: i32, chrono: i32) -> RunTotals {
        RunTotals {
            number_of_runs: 1,
            total_points: points,
            total_penalty: penalty,
            total_chrono_sec: chrono,
        }
    }

    #[test]
    fn live_ordering_prefers_longer_time_by_default() {
        let ordering = LiverankingOrdering::default();
        let slow = totals(10, 0, 120);
        let fast = totals(10, 0, 90);
        assert_eq!(ordering.compare((&slow, 2), (&fast, 1)), Ordering::Less);
    }

    #[test]
    fn export_ordering_prefers_shorter_time_by_default() {
        let ordering = ExportOrdering::default();
        let slow = totals(10, 0, 120);
        let fast = totals(10, 0, 90);
        assert_eq!(
            ordering.compare((false, &fast, 2), (false, &slow, 1)),
            Ordering::Less
        );
    }

    #[test]
    fn penalty_breaks_points_tie_before_time() {
        let ordering = LiverankingOrdering::default();
        let clean = totals(10, 0, 10);
        let penalised = totals(10, 5, 500);
        assert_eq!(
            ordering.compare((&clean, 9), (&penalised, 1)),
            Ordering::Less
        );
    }

    #[test]
    fn error_rows_sort_last_regardless_of_points() {
        let ordering = ExportOrdering::default();
        let broken = totals(100, 0, 0);
        let valid = totals(0, 50, 999);
        assert_eq!(
            ordering.compare((true, &broken, 1), (false, &valid, 2)),
            Ordering::Greater
        );
    }

    #[test]
    fn order_by_clause_follows_configured_direction() {
        let ordering = LiverankingOrdering {
            chrono: ChronoOrder::Ascending,
        };
        assert!(ordering.order_by_clause().contains("total_chrono_sec ASC"));
        assert!(
            LiverankingOrdering::default()
                .order_by_clause()
                .contains("total_chrono_sec DESC")
        );
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("DESC".parse::<ChronoOrder>().unwrap(), ChronoOrder::Descending);
        assert_eq!(
            "skip".parse::<MissingScalePolicy>().unwrap(),
            MissingScalePolicy::Skip
        );
        assert!("sideways".parse::<ChronoOrder>().is_err());
    }
}
