use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const DOOR_COUNT: usize = 6;

/// Pass/fail flag for each door of a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Doors {
    #[serde(default)]
    pub door1: bool,
    #[serde(default)]
    pub door2: bool,
    #[serde(default)]
    pub door3: bool,
    #[serde(default)]
    pub door4: bool,
    #[serde(default)]
    pub door5: bool,
    #[serde(default)]
    pub door6: bool,
}

impl Doors {
    pub fn as_array(&self) -> [bool; DOOR_COUNT] {
        [
            self.door1, self.door2, self.door3, self.door4, self.door5, self.door6,
        ]
    }

    pub fn from_array(doors: [bool; DOOR_COUNT]) -> Self {
        let [door1, door2, door3, door4, door5, door6] = doors;
        Self {
            door1,
            door2,
            door3,
            door4,
            door5,
            door6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Run {
    pub competition_id: i32,
    pub dossard: i32,
    pub run_number: i32,
    pub zone: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub doors: Doors,
    pub penalty: i32,
    pub chrono_sec: i32,
    pub referee_id: i32,
}

/// A run joined with the name of the referee who recorded it.
/// Names are empty when the referee record no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RunDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub run: Run,
    pub referee_first_name: String,
    pub referee_last_name: String,
}

/// Input for the run ledger. A `run_number` of zero or less asks the
/// store to assign the next number for the participant.
#[derive(Debug, Clone)]
pub struct NewRun {
    pub competition_id: i32,
    pub dossard: i32,
    pub run_number: i32,
    pub zone: String,
    pub doors: Doors,
    pub penalty: i32,
    pub chrono_sec: i32,
    pub referee_id: i32,
}

impl NewRun {
    pub fn has_explicit_number(&self) -> bool {
        self.run_number > 0
    }

    pub fn into_run(self, run_number: i32) -> Run {
        Run {
            competition_id: self.competition_id,
            dossard: self.dossard,
            run_number,
            zone: self.zone,
            doors: self.doors,
            penalty: self.penalty,
            chrono_sec: self.chrono_sec,
            referee_id: self.referee_id,
        }
    }
}
