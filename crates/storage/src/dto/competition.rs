use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Competition, NewCompetition};

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub description: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub location: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub organizer: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub contact: String,
}

impl From<CreateCompetitionRequest> for NewCompetition {
    fn from(req: CreateCompetitionRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
            date: req.date,
            location: req.location,
            organizer: req.organizer,
            contact: req.contact,
        }
    }
}

/// Response containing competition details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub organizer: String,
    pub contact: String,
    pub created_at: NaiveDateTime,
}

impl From<Competition> for CompetitionResponse {
    fn from(comp: Competition) -> Self {
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            description: comp.description,
            date: comp.date,
            location: comp.location,
            organizer: comp.organizer,
            contact: comp.contact,
            created_at: comp.created_at,
        }
    }
}

/// Grants the referee role on a competition to an existing user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddRefereeRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefereeResponse {
    pub user_id: i32,
    pub email: String,
    pub roles: Vec<String>,
}
