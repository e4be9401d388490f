//! Production backend: `responses` table
//!
//! Identifier is the table's autoincrement key. `created_at` is fixed-width
//! RFC 3339 UTC text, assigned inside the INSERT as the later of the current
//! time and the newest stored timestamp, so timestamps never decrease in
//! insertion order even if the wall clock steps backwards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

use super::ResponseStore;
use crate::models::{NewResponse, ResponseRecord};
use crate::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        // WAL allows concurrent readers alongside the single writer
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        create_responses_table(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn create_responses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            language TEXT NOT NULL,
            name TEXT NOT NULL,
            state TEXT NOT NULL,
            lga TEXT NOT NULL,
            ward TEXT NOT NULL,
            age TEXT NOT NULL,
            gender TEXT NOT NULL,
            knows_romeo TEXT NOT NULL,
            knows_muyideen TEXT NOT NULL,
            knows_abdulrasheed TEXT NOT NULL,
            heard_savewell TEXT NOT NULL,
            residence TEXT NOT NULL,
            phone TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_responses_created_at ON responses(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[async_trait]
impl ResponseStore for SqlStore {
    fn backend_name(&self) -> &'static str {
        "sql"
    }

    async fn append(&self, response: &NewResponse) -> Result<ResponseRecord> {
        let now = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        let row = sqlx::query(
            r#"
            INSERT INTO responses (
                created_at, language, name, state, lga, ward, age, gender,
                knows_romeo, knows_muyideen, knows_abdulrasheed, heard_savewell,
                residence, phone
            ) VALUES (
                (SELECT MAX(?, COALESCE(MAX(created_at), '')) FROM responses),
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            )
            RETURNING id, created_at
            "#,
        )
        .bind(&now)
        .bind(response.language.as_str())
        .bind(&response.name)
        .bind(&response.state)
        .bind(&response.lga)
        .bind(&response.ward)
        .bind(response.age.as_str())
        .bind(response.gender.as_str())
        .bind(response.knows_romeo.as_str())
        .bind(response.knows_muyideen.as_str())
        .bind(response.knows_abdulrasheed.as_str())
        .bind(response.heard_savewell.as_str())
        .bind(&response.residence)
        .bind(&response.phone)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;
        let created_at = match parse_timestamp(&created_at) {
            Some(ts) => ts,
            None => {
                warn!(id, "Unparseable created_at '{}' returned on insert", created_at);
                return Err(Error::Storage(format!(
                    "Insert returned unparseable created_at '{}'",
                    created_at
                )));
            }
        };

        Ok(response.to_record(Some(id), created_at))
    }

    async fn list_all(&self) -> Result<Vec<ResponseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, language, name, state, lga, ward, age, gender,
                   knows_romeo, knows_muyideen, knows_abdulrasheed, heard_savewell,
                   residence, phone
            FROM responses
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ResponseRecord> {
                let created_at: String = row.try_get("created_at")?;
                let parsed = parse_timestamp(&created_at);
                if parsed.is_none() {
                    warn!("Unparseable created_at '{}' in responses table", created_at);
                }

                Ok(ResponseRecord {
                    id: Some(row.try_get("id")?),
                    created_at: parsed,
                    language: row.try_get("language")?,
                    name: row.try_get("name")?,
                    state: row.try_get("state")?,
                    lga: row.try_get("lga")?,
                    ward: row.try_get("ward")?,
                    age: row.try_get("age")?,
                    gender: row.try_get("gender")?,
                    knows_romeo: row.try_get("knows_romeo")?,
                    knows_muyideen: row.try_get("knows_muyideen")?,
                    knows_abdulrasheed: row.try_get("knows_abdulrasheed")?,
                    heard_savewell: row.try_get("heard_savewell")?,
                    residence: row.try_get("residence")?,
                    phone: row.try_get("phone")?,
                })
            })
            .collect()
    }
}
