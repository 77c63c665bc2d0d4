//! Postgres-backed record store.

#[cfg(test)]
#[path = "postgres_test.rs"]
mod postgres_test;

use signature::artifact::SignatureArtifact;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::attendance::{Attendance, NewAttendance, RecordStore, StoreError};

type AttendanceRow = (Uuid, OffsetDateTime, String, String, String, String, String, String, String);

const COLUMNS: &str = "id, created_at, name, nip, position, institution, region, department, signature";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn from_row(row: AttendanceRow) -> Attendance {
    let (id, created_at, name, nip, position, institution, region, department, signature) = row;
    Attendance {
        id,
        created_at,
        name,
        nip,
        position,
        institution,
        region,
        department,
        signature: SignatureArtifact::from_stored(signature),
    }
}

#[async_trait::async_trait]
impl RecordStore for PgStore {
    async fn save(&self, record: NewAttendance) -> Result<Attendance, StoreError> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "INSERT INTO attendances (id, name, nip, position, institution, region, department, signature) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&record.name)
        .bind(&record.nip)
        .bind(&record.position)
        .bind(&record.institution)
        .bind(&record.region)
        .bind(&record.department)
        .bind(record.signature.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(from_row(row))
    }

    async fn list(&self) -> Result<Vec<Attendance>, StoreError> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {COLUMNS} FROM attendances ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }
}
