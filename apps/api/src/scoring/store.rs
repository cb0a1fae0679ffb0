use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeRow};
use crate::scoring::breakdown::Breakdown;

/// Opens the Postgres pool holding the `resumes` table.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Persistence collaborator for scoring: reads resumes, replaces their feedback.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn load_resume(&self, resume_id: Uuid) -> Result<ResumeRow, AppError>;

    /// Replaces the stored breakdown wholesale.
    async fn save_feedback(&self, resume_id: Uuid, breakdown: &Breakdown) -> Result<(), AppError>;
}

/// `ResumeStore` over the `resumes` table.
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn load_resume(&self, resume_id: Uuid) -> Result<ResumeRow, AppError> {
        load_resume(&self.pool, resume_id).await
    }

    async fn save_feedback(&self, resume_id: Uuid, breakdown: &Breakdown) -> Result<(), AppError> {
        save_feedback(&self.pool, resume_id, breakdown).await
    }
}

async fn load_resume(pool: &PgPool, resume_id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT id, user_id, campaign_id, file_name, structured_resume,
               resume_feedback, created_at, updated_at
        FROM resumes
        WHERE id = $1
        "#,
    )
    .bind(resume_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

/// Reads the extracted record out of a resume row. A missing or malformed
/// record is fatal for the whole scoring run.
pub fn structured_record(row: &ResumeRow) -> Result<ResumeRecord, AppError> {
    let value = row.structured_resume.as_ref().ok_or_else(|| {
        AppError::UnprocessableEntity(format!(
            "Resume {} has not been extracted yet",
            row.id
        ))
    })?;

    ResumeRecord::deserialize(value).map_err(|e| {
        AppError::UnprocessableEntity(format!(
            "Resume {} has an unreadable structured record: {e}",
            row.id
        ))
    })
}

async fn save_feedback(
    pool: &PgPool,
    resume_id: Uuid,
    breakdown: &Breakdown,
) -> Result<(), AppError> {
    let feedback = serde_json::to_value(breakdown)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize breakdown: {e}")))?;

    let result = sqlx::query(
        r#"
        UPDATE resumes
        SET resume_feedback = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(resume_id)
    .bind(&feedback)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    info!("Stored scoring breakdown for resume {resume_id}");
    Ok(())
}
