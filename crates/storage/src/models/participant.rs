use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::StorageError;

/// Gender code as used on start lists: `H` (hommes) or `F` (femmes).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum Gender {
    H,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H => "H",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "H" => Ok(Self::H),
            "F" => Ok(Self::F),
            other => Err(StorageError::InvalidInput(format!(
                "gender must be 'H' or 'F', got '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub competition_id: i32,
    pub dossard_number: i32,
    pub first_name: String,
    pub last_name: String,
    pub category: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub club: Option<String>,
}
