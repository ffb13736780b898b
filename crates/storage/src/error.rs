use std::fmt;

use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Competition,
    Participant,
    Scale,
    Run,
    User,
    Liveranking,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Competition => "Competition",
            Self::Participant => "Participant",
            Self::Scale => "Scale",
            Self::Run => "Run",
            Self::User => "User",
            Self::Liveranking => "Liveranking entry",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("No participant with dossard {dossard} in competition {competition_id}")]
    ParticipantNotFoundForRun { competition_id: i32, dossard: i32 },

    #[error("No scale for category '{category}' and zone '{zone}'")]
    ScaleNotFound { category: String, zone: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Run {run_number} already exists for dossard {dossard}")]
    DuplicateRun { dossard: i32, run_number: i32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Import failed on row {row}: {reason}")]
    Import { row: usize, reason: String },

    #[error("Workbook error: {0}")]
    Workbook(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Integer column overflow (22003).
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("22003")
        )
    }

    /// True for any uniqueness failure, whichever store produced it.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            StorageError::ConstraintViolation(_) | StorageError::DuplicateRun { .. }
        ) || self.is_unique_violation()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NotFound(_)
                | StorageError::ParticipantNotFoundForRun { .. }
                | StorageError::ScaleNotFound { .. }
        )
    }
}

impl From<rust_xlsxwriter::XlsxError> for StorageError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(error.to_string())
    }
}
