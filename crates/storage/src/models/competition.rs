use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub organizer: String,
    pub contact: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub name: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub organizer: String,
    pub contact: String,
}
