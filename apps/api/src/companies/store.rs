//! Data-access helpers for companies.

use sqlx::PgPool;

use crate::models::company::CompanyRow;

pub async fn get_company(pool: &PgPool, id: i64) -> Result<Option<CompanyRow>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_companies(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<CompanyRow>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies ORDER BY id OFFSET $1 LIMIT $2")
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn insert_company(
    pool: &PgPool,
    name: &str,
    industry: &str,
) -> Result<CompanyRow, sqlx::Error> {
    sqlx::query_as::<_, CompanyRow>(
        "INSERT INTO companies (name, industry) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(industry)
    .fetch_one(pool)
    .await
}
