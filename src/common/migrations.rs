// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. With `reset` set, existing tables are
/// dropped first.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("Dropped old tables");
    } else {
        info!("Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_core_tables(pool).await?;
    create_profile_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Drop tables in reverse dependency order
    let tables = ["education_details", "job_seeker_profiles", "users"];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_core_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Users table. Credentials live with the external identity service.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            email TEXT NOT NULL,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_profile_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Job seeker profiles, at most one per user
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS job_seeker_profiles (
            id TEXT PRIMARY KEY,
            user_id TEXT UNIQUE NOT NULL,
            name TEXT,
            email TEXT,
            mobile TEXT,
            status TEXT CHECK (status IS NULL OR status IN ('FRESHER', 'EXPERIENCED')),
            gender TEXT CHECK (gender IS NULL OR gender IN ('MALE', 'FEMALE', 'OTHER')),
            dob TEXT,
            education TEXT,
            work_experience TEXT,
            skills TEXT,
            resume_file_path TEXT,
            photo_file_path TEXT,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Education details, owned by a profile
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS education_details (
            id TEXT PRIMARY KEY,
            profile_id TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            qualification TEXT,
            specialization TEXT,
            year_of_passing INTEGER,
            FOREIGN KEY (profile_id) REFERENCES job_seeker_profiles(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_education_details_profile ON education_details(profile_id, position)",
        "CREATE INDEX IF NOT EXISTS idx_job_seeker_profiles_user ON job_seeker_profiles(user_id)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_pool().await;
        run_migrations(&pool, false).await.unwrap();
        run_migrations(&pool, false).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["education_details", "job_seeker_profiles", "users"]);
    }

    #[tokio::test]
    async fn test_reset_drops_data() {
        let pool = memory_pool().await;
        run_migrations(&pool, false).await.unwrap();

        sqlx::query("INSERT INTO users (id, username, email) VALUES ('U_1', 'alice', 'a@x.io')")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool, true).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_status_constraint() {
        let pool = memory_pool().await;
        run_migrations(&pool, false).await.unwrap();

        sqlx::query("INSERT INTO users (id, username, email) VALUES ('U_1', 'alice', 'a@x.io')")
            .execute(&pool)
            .await
            .unwrap();

        let result = sqlx::query(
            "INSERT INTO job_seeker_profiles (id, user_id, status) VALUES ('P_1', 'U_1', 'RETIRED')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
