//! Attendance records and the record store seam.
//!
//! DESIGN
//! ======
//! Handlers only see `Arc<dyn RecordStore>`. Which implementation sits behind
//! it (Postgres or the process-lifetime memory store) is decided once at
//! startup from `DATABASE_URL`. Both assign `id` and `created_at` themselves
//! and list newest first.
//!
//! The signature travels as an opaque artifact string; the store never
//! inspects it.

use serde::{Deserialize, Serialize};
use signature::artifact::SignatureArtifact;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::routes::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

/// A submitted attendance form, validated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub name: String,
    pub nip: String,
    pub position: String,
    pub institution: String,
    pub region: String,
    pub department: String,
    pub signature: SignatureArtifact,
}

/// A stored attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub name: String,
    pub nip: String,
    pub position: String,
    pub institution: String,
    pub region: String,
    pub department: String,
    pub signature: SignatureArtifact,
}

impl Attendance {
    /// Stamp a new submission with a fresh id and the given creation time.
    #[must_use]
    pub fn from_new(record: NewAttendance, created_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            name: record.name,
            nip: record.nip,
            position: record.position,
            institution: record.institution,
            region: record.region,
            department: record.department,
            signature: record.signature,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Durable home of attendance records. Enables mocking in tests.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a submission and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    async fn save(&self, record: NewAttendance) -> Result<Attendance, StoreError>;

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    async fn list(&self) -> Result<Vec<Attendance>, StoreError>;
}
