use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::run::DOOR_COUNT;

/// Points awarded for each of the six doors of a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DoorPoints {
    pub points_door1: i32,
    pub points_door2: i32,
    pub points_door3: i32,
    pub points_door4: i32,
    pub points_door5: i32,
    pub points_door6: i32,
}

impl DoorPoints {
    pub fn as_array(&self) -> [i32; DOOR_COUNT] {
        [
            self.points_door1,
            self.points_door2,
            self.points_door3,
            self.points_door4,
            self.points_door5,
            self.points_door6,
        ]
    }
}

/// Scoring table for one (competition, category, zone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Scale {
    pub competition_id: i32,
    pub category: String,
    pub zone: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub points: DoorPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ZoneInfo {
    pub category: String,
    pub zone: String,
}
