use std::collections::HashMap;

use crate::error::{Result, StorageError};
use crate::models::{Run, RunTotals, Scale};

use super::policy::MissingScalePolicy;

/// Sum of the scale's door values over the doors the run passed.
pub fn compute_points(run: &Run, scale: &Scale) -> i32 {
    run.doors
        .as_array()
        .into_iter()
        .zip(scale.points.as_array())
        .filter_map(|(passed, points)| passed.then_some(points))
        .fold(0, i32::saturating_add)
}

/// Scales of one competition keyed by (category, zone).
#[derive(Debug, Default, Clone)]
pub struct ScaleIndex {
    scales: HashMap<(String, String), Scale>,
}

impl ScaleIndex {
    pub fn new(scales: impl IntoIterator<Item = Scale>) -> Self {
        let scales = scales
            .into_iter()
            .map(|s| ((s.category.clone(), s.zone.clone()), s))
            .collect();
        Self { scales }
    }

    pub fn get(&self, category: &str, zone: &str) -> Option<&Scale> {
        self.scales.get(&(category.to_string(), zone.to_string()))
    }

    /// Zones scored for `category`, sorted by name.
    pub fn zones_for_category(&self, category: &str) -> Vec<String> {
        let mut zones: Vec<String> = self
            .scales
            .keys()
            .filter(|(c, _)| c == category)
            .map(|(_, z)| z.clone())
            .collect();
        zones.sort();
        zones
    }

    /// Distinct categories, sorted by name.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.scales.keys().map(|(c, _)| c.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Points for `run` scored as `category`. `Ok(None)` means the scale is
    /// missing and the policy says to skip the run.
    pub fn score(
        &self,
        run: &Run,
        category: &str,
        policy: MissingScalePolicy,
    ) -> Result<Option<i32>> {
        match (self.get(category, &run.zone), policy) {
            (Some(scale), _) => Ok(Some(compute_points(run, scale))),
            (None, MissingScalePolicy::Skip) => Ok(None),
            (None, MissingScalePolicy::Reject) => Err(StorageError::ScaleNotFound {
                category: category.to_string(),
                zone: run.zone.clone(),
            }),
        }
    }
}

/// Totals for a participant's current run set. Runs skipped for a missing
/// scale contribute nothing, not even to the run count.
pub fn totals_for_runs<'a>(
    runs: impl IntoIterator<Item = &'a Run>,
    category: &str,
    scales: &ScaleIndex,
    policy: MissingScalePolicy,
) -> Result<RunTotals> {
    let mut totals = RunTotals::default();
    for run in runs {
        let Some(points) = scales.score(run, category, policy)? else {
            tracing::debug!(
                dossard = run.dossard,
                run_number = run.run_number,
                zone = %run.zone,
                "Skipping run without scale"
            );
            continue;
        };
        totals = totals.checked_add(&RunTotals::single(points, run.penalty, run.chrono_sec))?;
    }
    Ok(totals)
}
