//! Data-access helpers for job postings. All queries run against the
//! shared pool; each call is a single statement committed on its own.

use sqlx::PgPool;

use crate::models::job::JobPostingRow;

pub async fn get_job(pool: &PgPool, id: i64) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_jobs(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn insert_job(
    pool: &PgPool,
    title: &str,
    description: Option<&str>,
    company_id: i64,
) -> Result<JobPostingRow, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        r#"
        INSERT INTO job_postings (title, description, company_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(company_id)
    .fetch_one(pool)
    .await
}

/// Writes back the full row. Callers overlay partial updates onto a
/// fetched row first, so unset fields keep their stored values.
pub async fn update_job(pool: &PgPool, job: &JobPostingRow) -> Result<JobPostingRow, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        r#"
        UPDATE job_postings
        SET title = $1, description = $2, company_id = $3, updated_at = now()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(&job.title)
    .bind(&job.description)
    .bind(job.company_id)
    .bind(job.id)
    .fetch_one(pool)
    .await
}

/// Returns `false` when no row with that id existed.
pub async fn delete_job(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Overwrites the stored description. Used by the generation endpoint
/// after the streamed draft has been fully accumulated and parsed.
pub async fn set_description(
    pool: &PgPool,
    id: i64,
    description: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE job_postings SET description = $1, updated_at = now() WHERE id = $2")
        .bind(description)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
