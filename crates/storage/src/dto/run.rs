use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Doors, NewRun, Run};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRunRequest {
    #[validate(range(min = 1, message = "Dossard number must be positive"))]
    pub dossard: i32,

    /// Omit (or send 0) to take the participant's next run number
    pub run_number: Option<i32>,

    #[validate(length(min = 1, max = 100, message = "Zone is required"))]
    pub zone: String,

    #[serde(flatten)]
    pub doors: Doors,

    #[validate(range(min = 0, max = 10_000, message = "Penalty must be between 0 and 10000"))]
    #[serde(default)]
    pub penalty: i32,

    /// Seconds, at most one day
    #[validate(range(min = 0, max = 86_400, message = "Chrono must be between 0 and 86400 seconds"))]
    #[serde(default)]
    pub chrono_sec: i32,
}

impl CreateRunRequest {
    pub fn into_new_run(self, competition_id: i32, referee_id: i32) -> NewRun {
        NewRun {
            competition_id,
            dossard: self.dossard,
            run_number: self.run_number.unwrap_or(0),
            zone: self.zone.trim().to_string(),
            doors: self.doors,
            penalty: self.penalty,
            chrono_sec: self.chrono_sec,
            referee_id,
        }
    }
}

/// Full replacement of a run's mutable fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRunRequest {
    #[validate(length(min = 1, max = 100, message = "Zone is required"))]
    pub zone: String,

    #[serde(flatten)]
    pub doors: Doors,

    #[validate(range(min = 0, max = 10_000, message = "Penalty must be between 0 and 10000"))]
    #[serde(default)]
    pub penalty: i32,

    /// Seconds, at most one day
    #[validate(range(min = 0, max = 86_400, message = "Chrono must be between 0 and 86400 seconds"))]
    #[serde(default)]
    pub chrono_sec: i32,

    /// Defaults to the caller
    pub referee_id: Option<i32>,
}

impl UpdateRunRequest {
    pub fn into_run(
        self,
        competition_id: i32,
        dossard: i32,
        run_number: i32,
        caller_id: i32,
    ) -> Run {
        Run {
            competition_id,
            dossard,
            run_number,
            zone: self.zone.trim().to_string(),
            doors: self.doors,
            penalty: self.penalty,
            chrono_sec: self.chrono_sec,
            referee_id: self.referee_id.unwrap_or(caller_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(penalty: i32, chrono_sec: i32) -> CreateRunRequest {
        CreateRunRequest {
            dossard: 7,
            run_number: None,
            zone: "A".to_string(),
            doors: Doors::default(),
            penalty,
            chrono_sec,
        }
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(10_000, 86_400, true)]
    #[case(-1, 30, false)]
    #[case(10_001, 30, false)]
    #[case(0, 86_401, false)]
    #[case(0, i32::MAX, false)]
    fn run_values_are_bounded(#[case] penalty: i32, #[case] chrono: i32, #[case] valid: bool) {
        assert_eq!(request(penalty, chrono).validate().is_ok(), valid);
    }
}
