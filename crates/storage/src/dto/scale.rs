use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{DoorPoints, Scale};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateScaleRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[validate(length(min = 1, max = 100))]
    pub zone: String,

    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door1: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door2: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door3: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door4: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door5: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door6: i32,
}

impl CreateScaleRequest {
    pub fn into_scale(self, competition_id: i32) -> Scale {
        Scale {
            competition_id,
            category: self.category.trim().to_string(),
            zone: self.zone.trim().to_string(),
            points: DoorPoints {
                points_door1: self.points_door1,
                points_door2: self.points_door2,
                points_door3: self.points_door3,
                points_door4: self.points_door4,
                points_door5: self.points_door5,
                points_door6: self.points_door6,
            },
        }
    }
}

/// New door values for an existing (category, zone) scale
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateScaleRequest {
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door1: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door2: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door3: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door4: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door5: i32,
    #[validate(range(min = 0, max = 100_000, message = "Door points must be between 0 and 100000"))]
    pub points_door6: i32,
}

impl UpdateScaleRequest {
    pub fn into_scale(self, competition_id: i32, category: String, zone: String) -> Scale {
        Scale {
            competition_id,
            category,
            zone,
            points: DoorPoints {
                points_door1: self.points_door1,
                points_door2: self.points_door2,
                points_door3: self.points_door3,
                points_door4: self.points_door4,
                points_door5: self.points_door5,
                points_door6: self.points_door6,
            },
        }
    }
}
