use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Gender, Participant};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateParticipantRequest {
    #[validate(range(min = 1, message = "Dossard number must be positive"))]
    pub dossard_number: i32,

    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    pub gender: Gender,

    #[validate(length(max = 255))]
    pub club: Option<String>,
}

impl CreateParticipantRequest {
    pub fn into_participant(self, competition_id: i32) -> Participant {
        Participant {
            competition_id,
            dossard_number: self.dossard_number,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            category: self.category.trim().to_string(),
            gender: self.gender,
            club: self.club.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Full replacement of a participant's identity fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateParticipantRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    pub gender: Gender,

    #[validate(length(max = 255))]
    pub club: Option<String>,
}

impl UpdateParticipantRequest {
    pub fn into_participant(self, competition_id: i32, dossard_number: i32) -> Participant {
        Participant {
            competition_id,
            dossard_number,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            category: self.category.trim().to_string(),
            gender: self.gender,
            club: self.club.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParticipantFilter {
    /// Restrict the list to one category
    pub category: Option<String>,
}
