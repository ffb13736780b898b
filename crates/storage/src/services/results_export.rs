//! Final results, rebuilt from participants, runs and scales without reading
//! the stored liveranking totals.
//!
//! The output is a list of logical sheets, each a list of
//! `(row, column, value)` cells. Turning those into a binary workbook is the
//! job of [`super::workbook`].

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Result;
use crate::models::{Gender, Participant, Run, RunTotals};
use crate::store::Store;

use super::points_table::points_for_position;
use super::policy::{ExportOrdering, MissingScalePolicy, ScoringPolicy};
use super::scoring::ScaleIndex;

pub const ERROR_MARKER: &str = "ERROR";

const MAX_SHEET_NAME_LEN: usize = 31;
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(i32),
    Empty,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub category: String,
    pub gender: Gender,
    pub cells: Vec<Cell>,
}

impl Sheet {
    pub fn value_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.col == col)
            .map(|c| &c.value)
    }

    /// Number of data rows below the header.
    pub fn row_count(&self) -> u32 {
        self.cells.iter().map(|c| c.row).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct ResultsExport {
    pub filename: String,
    pub sheets: Vec<Sheet>,
}

/// One expected run slot of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneResult {
    Scored {
        points: i32,
        penalty: i32,
        chrono_sec: i32,
    },
    /// No scale for the run; counted nowhere.
    Skipped,
    Error,
}

#[derive(Debug, Clone)]
pub struct ParticipantResult {
    pub participant: Participant,
    pub zone_results: Vec<ZoneResult>,
    pub totals: RunTotals,
    pub has_error: bool,
}

/// Categories with exactly two zones are run out and back, so every zone is
/// expected twice.
pub fn expected_runs_per_zone(zone_count: usize) -> usize {
    if zone_count == 2 { 2 } else { 1 }
}

pub fn export_filename(competition_name: &str) -> String {
    format!("{}_results.xlsx", competition_name.replace(' ', "_"))
}

/// `<category>-<gender>` made acceptable to spreadsheet applications and
/// unique (case-insensitively) among `taken`.
pub fn sheet_name(category: &str, gender: Gender, taken: &mut HashSet<String>) -> String {
    let raw: String = format!("{category}-{gender}")
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let base: String = raw
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let base = if base.is_empty() {
        "Sheet".to_string()
    } else {
        base
    };

    let mut candidate = base.clone();
    let mut suffix = 2;
    while !taken.insert(candidate.to_lowercase()) {
        let tail = format!("~{suffix}");
        let keep = MAX_SHEET_NAME_LEN - tail.len();
        candidate = format!("{}{tail}", base.chars().take(keep).collect::<String>());
        suffix += 1;
    }
    candidate
}

pub async fn build_export(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
) -> Result<ResultsExport> {
    let competition = store.get_competition(competition_id).await?;
    let scales = ScaleIndex::new(store.list_scales(competition_id).await?);

    let mut groups: BTreeMap<(String, Gender), Vec<Participant>> = BTreeMap::new();
    for category in scales.categories() {
        for participant in store
            .list_participants_by_category(competition_id, &category)
            .await?
        {
            groups
                .entry((category.clone(), participant.gender))
                .or_default()
                .push(participant);
        }
    }

    let mut runs_by_dossard: HashMap<i32, Vec<Run>> = HashMap::new();
    for run in store.list_runs(competition_id).await? {
        runs_by_dossard.entry(run.dossard).or_default().push(run);
    }

    let mut taken = HashSet::new();
    let mut sheets = Vec::with_capacity(groups.len());
    for ((category, gender), participants) in groups {
        let zones = scales.zones_for_category(&category);
        let results = rank_group(
            &participants,
            &zones,
            &runs_by_dossard,
            &scales,
            policy.export_missing_scale,
            policy.export_ordering,
        )?;
        let name = sheet_name(&category, gender, &mut taken);
        tracing::debug!(
            sheet = %name,
            participants = results.len(),
            errors = results.iter().filter(|r| r.has_error).count(),
            "Export sheet built"
        );
        sheets.push(render_sheet(name, category, gender, &zones, &results));
    }

    tracing::info!(
        competition_id,
        sheets = sheets.len(),
        "Results export generated"
    );
    Ok(ResultsExport {
        filename: export_filename(&competition.name),
        sheets,
    })
}

/// Scores and sorts one (category, gender) group.
pub fn rank_group(
    participants: &[Participant],
    zones: &[String],
    runs_by_dossard: &HashMap<i32, Vec<Run>>,
    scales: &ScaleIndex,
    missing_scale: MissingScalePolicy,
    ordering: ExportOrdering,
) -> Result<Vec<ParticipantResult>> {
    let expected = expected_runs_per_zone(zones.len());
    let no_runs = Vec::new();

    let mut results = Vec::with_capacity(participants.len());
    for participant in participants {
        let runs = runs_by_dossard
            .get(&participant.dossard_number)
            .unwrap_or(&no_runs);

        let mut result = ParticipantResult {
            participant: participant.clone(),
            zone_results: Vec::with_capacity(zones.len() * expected),
            totals: RunTotals::default(),
            has_error: false,
        };

        for zone in zones {
            let zone_runs: Vec<&Run> = runs.iter().filter(|r| &r.zone == zone).collect();
            if zone_runs.len() != expected {
                result
                    .zone_results
                    .extend(std::iter::repeat_n(ZoneResult::Error, expected));
                result.has_error = true;
                continue;
            }

            for run in zone_runs {
                let Some(points) = scales.score(run, &participant.category, missing_scale)? else {
                    result.zone_results.push(ZoneResult::Skipped);
                    continue;
                };
                result.zone_results.push(ZoneResult::Scored {
                    points,
                    penalty: run.penalty,
                    chrono_sec: run.chrono_sec,
                });
                result.totals = result
                    .totals
                    .checked_add(&RunTotals::single(points, run.penalty, run.chrono_sec))?;
            }
        }

        if result.has_error {
            result.totals = RunTotals::default();
        }
        results.push(result);
    }

    results.sort_by(|a, b| {
        ordering.compare(
            (a.has_error, &a.totals, a.participant.dossard_number),
            (b.has_error, &b.totals, b.participant.dossard_number),
        )
    });
    Ok(results)
}

/// Header labels for the given zones.
pub fn headers(zones: &[String]) -> Vec<String> {
    let expected = expected_runs_per_zone(zones.len());
    let mut headers: Vec<String> = ["Position", "Dossard", "Last Name", "First Name", "Club"]
        .into_iter()
        .map(String::from)
        .collect();

    for zone in zones {
        for occurrence in 1..=expected {
            let label = if expected > 1 {
                format!("{zone} ({occurrence})")
            } else {
                zone.clone()
            };
            headers.push(format!("{label} Points"));
            headers.push(format!("{label} Penalty"));
            headers.push(format!("{label} Time"));
        }
    }

    headers.extend(
        ["Total Points", "Total Penalty", "Total Time", "Points Earned"]
            .into_iter()
            .map(String::from),
    );
    headers
}

fn render_sheet(
    name: String,
    category: String,
    gender: Gender,
    zones: &[String],
    results: &[ParticipantResult],
) -> Sheet {
    let mut cells = Vec::new();
    for (col, header) in headers(zones).into_iter().enumerate() {
        cells.push(Cell {
            row: 0,
            col: col as u16,
            value: header.into(),
        });
    }

    for (index, result) in results.iter().enumerate() {
        let row = index as u32 + 1;
        let position = index + 1;
        let participant = &result.participant;

        let mut values: Vec<CellValue> = vec![
            (position as i32).into(),
            participant.dossard_number.into(),
            participant.last_name.as_str().into(),
            participant.first_name.as_str().into(),
            participant
                .club
                .as_deref()
                .map_or(CellValue::Empty, CellValue::from),
        ];

        for zone_result in &result.zone_results {
            match *zone_result {
                ZoneResult::Scored {
                    points,
                    penalty,
                    chrono_sec,
                } => values.extend([points.into(), penalty.into(), chrono_sec.into()]),
                ZoneResult::Skipped => values.extend(std::iter::repeat_n(CellValue::Empty, 3)),
                ZoneResult::Error => {
                    values.extend(std::iter::repeat_n(CellValue::from(ERROR_MARKER), 3))
                }
            }
        }

        if result.has_error {
            values.extend(std::iter::repeat_n(CellValue::from(ERROR_MARKER), 4));
        } else {
            values.extend([
                result.totals.total_points.into(),
                result.totals.total_penalty.into(),
                result.totals.total_chrono_sec.into(),
                points_for_position(position).into(),
            ]);
        }

        cells.extend(values.into_iter().enumerate().map(|(col, value)| Cell {
            row,
            col: col as u16,
            value,
        }));
    }

    Sheet {
        name,
        category,
        gender,
        cells,
    }
}
