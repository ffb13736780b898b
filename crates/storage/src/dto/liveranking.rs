use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common::{Page, PaginationMeta};
use crate::models::{Gender, LiverankingEntry};
use crate::services::liveranking::LiverankingPage;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LiverankingParams {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Entries per page (default 10, at most 100)
    pub page_size: Option<i64>,
}

impl LiverankingParams {
    pub fn page(&self) -> Page {
        Page::from_params(self.page, self.page_size)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CategoryRankingParams {
    pub category: Option<String>,
    /// `H` or `F`
    pub gender: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl CategoryRankingParams {
    pub fn page(&self) -> Page {
        Page::from_params(self.page, self.page_size)
    }

    /// Both filters are required.
    pub fn filter(&self) -> Result<(String, Gender), String> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| "category is required".to_string())?;
        let gender = self
            .gender
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| "gender is required".to_string())?
            .parse::<Gender>()
            .map_err(|_| "gender must be 'H' or 'F'".to_string())?;
        Ok((category.to_string(), gender))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LiverankingResponse {
    pub rank: i64,
    pub dossard: i32,
    pub first_name: String,
    pub last_name: String,
    pub category: String,
    pub gender: Gender,
    pub number_of_runs: i32,
    pub total_points: i32,
    pub total_penalty: i32,
    pub total_chrono_sec: i32,
}

impl LiverankingResponse {
    fn ranked(rank: i64, entry: LiverankingEntry) -> Self {
        Self {
            rank,
            dossard: entry.dossard_number,
            first_name: entry.first_name,
            last_name: entry.last_name,
            category: entry.category,
            gender: entry.gender,
            number_of_runs: entry.totals.number_of_runs,
            total_points: entry.totals.total_points,
            total_penalty: entry.totals.total_penalty,
            total_chrono_sec: entry.totals.total_chrono_sec,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LiverankingListResponse {
    pub competition_id: i32,
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub rankings: Vec<LiverankingResponse>,
    pub pagination: PaginationMeta,
}

impl LiverankingListResponse {
    pub fn from_page(
        competition_id: i32,
        filter: Option<(String, Gender)>,
        page: LiverankingPage,
    ) -> Self {
        let LiverankingPage {
            entries,
            total,
            page,
        } = page;
        let rankings = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| LiverankingResponse::ranked(page.rank_of(i), entry))
            .collect();
        let (category, gender) = match filter {
            Some((category, gender)) => (Some(category), Some(gender)),
            None => (None, None),
        };

        Self {
            competition_id,
            category,
            gender,
            rankings,
            pagination: PaginationMeta::new(page, total),
        }
    }
}
