use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{Attempt, Interview};

pub async fn insert(
    pool: &PgPool,
    owner_id: Uuid,
    job_title: &str,
    topics: &str,
    experience_years: f64,
) -> Result<Interview, AppError> {
    Ok(sqlx::query_as::<_, Interview>(
        r#"
        INSERT INTO interviews (id, owner_id, job_title, topics, experience_years, attempts)
        VALUES ($1, $2, $3, $4, $5, '[]'::jsonb)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(job_title)
    .bind(topics)
    .bind(experience_years)
    .fetch_one(pool)
    .await?)
}

/// Interviews are keyed by owner alone; `owner_id` is the single source
/// of truth for ownership, there is no owner-side reference list.
pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Interview>, AppError> {
    Ok(sqlx::query_as::<_, Interview>(
        "SELECT * FROM interviews WHERE owner_id = $1 ORDER BY created_at ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?)
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Interview>, AppError> {
    Ok(
        sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Fields to overwrite on an interview. `None` leaves the stored value
/// untouched.
#[derive(Debug, Default)]
pub struct MetadataPatch<'a> {
    pub job_title: Option<&'a str>,
    pub topics: Option<&'a str>,
    pub experience_years: Option<f64>,
}

impl MetadataPatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none() && self.topics.is_none() && self.experience_years.is_none()
    }
}

/// Overwrites only the fields present in the patch and bumps
/// `updated_at`. Returns `None` when the interview does not exist.
pub async fn update_metadata(
    pool: &PgPool,
    id: Uuid,
    patch: &MetadataPatch<'_>,
) -> Result<Option<Interview>, AppError> {
    Ok(sqlx::query_as::<_, Interview>(
        r#"
        UPDATE interviews
        SET job_title = COALESCE($2, job_title),
            topics = COALESCE($3, topics),
            experience_years = COALESCE($4, experience_years),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(patch.job_title)
    .bind(patch.topics)
    .bind(patch.experience_years)
    .fetch_optional(pool)
    .await?)
}

/// Removes the interview if it still exists. Deleting an already-absent
/// row is not an error; ownership is checked by the `owner_id` predicate.
pub async fn delete(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM interviews WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Appends one attempt to the interview's embedded log. The append is a
/// single JSONB concatenation executed by the store, so two concurrent
/// appends against the same interview cannot lose either attempt.
/// Returns `None` when the interview does not exist.
pub async fn append_attempt(
    pool: &PgPool,
    id: Uuid,
    attempt: &Attempt,
) -> Result<Option<Interview>, AppError> {
    let value = serde_json::to_value(attempt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("attempt serialization failed: {e}")))?;

    Ok(sqlx::query_as::<_, Interview>(
        r#"
        UPDATE interviews
        SET attempts = attempts || $2::jsonb,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(value)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patch_is_empty() {
        assert!(MetadataPatch::default().is_empty());
    }

    #[test]
    fn test_patch_with_any_field_is_not_empty() {
        let patch = MetadataPatch {
            job_title: Some("Backend Engineer"),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let patch = MetadataPatch {
            experience_years: Some(0.0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
