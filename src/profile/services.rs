// src/profile/services.rs

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::mapping;
use super::models::{
    EducationDetail, JobSeekerProfile, JobSeekerProfileDto, JobSeekerRegisterRequest,
    ProfileAggregate,
};
use super::validators::{ProfileUpdateValidator, RegistrationValidator};
use crate::auth::User;
use crate::common::{
    generate_profile_id, generate_user_id, safe_email_log, sqlite_now, ApiError, Validator,
};
use crate::services::Category;

const PROFILE_COLUMNS: &str = r#"
    id, user_id, name, email, mobile, status, gender, dob, education,
    work_experience, skills, resume_file_path, photo_file_path, created_at, updated_at
"#;

pub struct ProfileService {
    db: SqlitePool,
}

impl ProfileService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Registration
    // ============================================================================

    /// Create a user and its profile in one transaction
    pub async fn register(
        &self,
        request: JobSeekerRegisterRequest,
    ) -> Result<ProfileAggregate, ApiError> {
        RegistrationValidator.check(&request)?;

        let user = User {
            id: generate_user_id(),
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            created_at: None,
        };
        let profile = mapping::from_registration(generate_profile_id(), &user, &request)?;

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        sqlx::query("INSERT INTO users (id, username, email) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    ApiError::ValidationError("Username already exists".to_string())
                } else {
                    ApiError::DatabaseError(e)
                }
            })?;

        upsert_profile(&mut tx, &profile).await?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            username = %user.username,
            email = %safe_email_log(&user.email),
            profile_id = %profile.id,
            "Registered job seeker"
        );

        Ok(ProfileAggregate {
            profile,
            education_details: Vec::new(),
        })
    }

    // ============================================================================
    // Lookup
    // ============================================================================

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    async fn require_user(&self, username: &str) -> Result<User, ApiError> {
        self.find_user_by_username(username)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", username)))
    }

    /// Load the user's profile, creating the placeholder profile on first access
    pub async fn get_or_create_profile(&self, username: &str) -> Result<ProfileAggregate, ApiError> {
        let user = self.require_user(username).await?;
        let mut conn = self.db.acquire().await.map_err(ApiError::DatabaseError)?;

        if let Some(profile) = fetch_profile_by_user(&mut conn, &user.id).await? {
            return load_aggregate(&mut conn, profile).await;
        }

        let placeholder = mapping::placeholder(generate_profile_id(), &user);
        let profile = insert_placeholder(&mut conn, &placeholder).await?;

        load_aggregate(&mut conn, profile).await
    }

    // ============================================================================
    // Updates
    // ============================================================================

    /// Overwrite the user's profile and replace its education details
    pub async fn update_profile(
        &self,
        username: &str,
        dto: &JobSeekerProfileDto,
    ) -> Result<ProfileAggregate, ApiError> {
        ProfileUpdateValidator.check(dto)?;

        let user = self.require_user(username).await?;
        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let profile = match fetch_profile_by_user(&mut tx, &user.id).await? {
            Some(profile) => profile,
            None => {
                let placeholder = mapping::placeholder(generate_profile_id(), &user);
                insert_placeholder(&mut tx, &placeholder).await?
            }
        };
        let mut aggregate = load_aggregate(&mut tx, profile).await?;

        mapping::apply_update(&mut aggregate, dto)?;
        aggregate.profile.updated_at = Some(sqlite_now());

        upsert_profile(&mut tx, &aggregate.profile).await?;
        replace_education_details(&mut tx, &aggregate).await?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            username = %username,
            profile_id = %aggregate.profile.id,
            education_details = aggregate.education_details.len(),
            "Updated job seeker profile"
        );

        Ok(aggregate)
    }

    /// Null out the resume or photo reference.
    ///
    /// Returns the previous reference only when no other profile still points
    /// at it, so the caller may delete the stored file.
    pub async fn clear_file_reference(
        &self,
        username: &str,
        category: Category,
    ) -> Result<Option<String>, ApiError> {
        let user = self.require_user(username).await?;
        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let Some(profile) = fetch_profile_by_user(&mut tx, &user.id).await? else {
            return Err(ApiError::NotFound("Profile not found".to_string()));
        };

        let (previous, column) = match category {
            Category::Resumes => (profile.resume_file_path, "resume_file_path"),
            Category::Photos => (profile.photo_file_path, "photo_file_path"),
        };

        sqlx::query(&format!(
            "UPDATE job_seeker_profiles SET {} = NULL, updated_at = ? WHERE id = ?",
            column
        ))
        .bind(sqlite_now())
        .bind(&profile.id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        let deletable = match previous {
            Some(reference) => {
                let holders = count_other_holders(&mut tx, &reference, &profile.id).await?;
                if holders > 0 {
                    warn!(
                        username = %username,
                        reference = %reference,
                        holders,
                        "Reference is held by other profiles, keeping stored file"
                    );
                    None
                } else {
                    Some(reference)
                }
            }
            None => None,
        };

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        debug!(username = %username, column, deletable = ?deletable, "Cleared file reference");

        Ok(deletable)
    }

    // ============================================================================
    // Listing
    // ============================================================================

    /// Every profile with its education details, oldest first
    pub async fn list_profiles(&self) -> Result<Vec<ProfileAggregate>, ApiError> {
        let profiles = sqlx::query_as::<_, JobSeekerProfile>(&format!(
            "SELECT {} FROM job_seeker_profiles ORDER BY created_at ASC, id ASC",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let details = sqlx::query_as::<_, EducationDetail>(
            r#"
            SELECT id, profile_id, position, qualification, specialization, year_of_passing
            FROM education_details
            ORDER BY profile_id, position ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let mut by_profile: HashMap<String, Vec<EducationDetail>> = HashMap::new();
        for detail in details {
            by_profile
                .entry(detail.profile_id.clone())
                .or_default()
                .push(detail);
        }

        Ok(profiles
            .into_iter()
            .map(|profile| {
                let education_details = by_profile.remove(&profile.id).unwrap_or_default();
                ProfileAggregate {
                    profile,
                    education_details,
                }
            })
            .collect())
    }
}

async fn fetch_profile_by_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<JobSeekerProfile>, ApiError> {
    sqlx::query_as::<_, JobSeekerProfile>(&format!(
        "SELECT {} FROM job_seeker_profiles WHERE user_id = ?",
        PROFILE_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(ApiError::DatabaseError)
}

/// Insert the placeholder unless the user already has a profile, then return
/// whichever row won.
async fn insert_placeholder(
    conn: &mut SqliteConnection,
    placeholder: &JobSeekerProfile,
) -> Result<JobSeekerProfile, ApiError> {
    let inserted = sqlx::query(&format!(
        "INSERT INTO job_seeker_profiles ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now')) \
         ON CONFLICT(user_id) DO NOTHING",
        PROFILE_COLUMNS
    ))
    .bind(&placeholder.id)
    .bind(&placeholder.user_id)
    .bind(&placeholder.name)
    .bind(&placeholder.email)
    .bind(&placeholder.mobile)
    .bind(placeholder.status.map(|s| s.as_str()))
    .bind(placeholder.gender.map(|g| g.as_str()))
    .bind(placeholder.dob.map(|d| d.format("%Y-%m-%d").to_string()))
    .bind(&placeholder.education)
    .bind(&placeholder.work_experience)
    .bind(&placeholder.skills)
    .bind(&placeholder.resume_file_path)
    .bind(&placeholder.photo_file_path)
    .execute(&mut *conn)
    .await
    .map_err(ApiError::DatabaseError)?;

    if inserted.rows_affected() > 0 {
        info!(user_id = %placeholder.user_id, profile_id = %placeholder.id, "Created placeholder profile");
    }

    // Re-read so a profile created concurrently wins over ours
    fetch_profile_by_user(&mut *conn, &placeholder.user_id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("Failed to create profile".to_string()))
}

/// Profiles other than `profile_id` whose resume or photo is `reference`
async fn count_other_holders(
    conn: &mut SqliteConnection,
    reference: &str,
    profile_id: &str,
) -> Result<i64, ApiError> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM job_seeker_profiles
        WHERE (resume_file_path = ? OR photo_file_path = ?) AND id != ?
        "#,
    )
    .bind(reference)
    .bind(reference)
    .bind(profile_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(ApiError::DatabaseError)
}

async fn load_aggregate(
    conn: &mut SqliteConnection,
    profile: JobSeekerProfile,
) -> Result<ProfileAggregate, ApiError> {
    let education_details = sqlx::query_as::<_, EducationDetail>(
        r#"
        SELECT id, profile_id, position, qualification, specialization, year_of_passing
        FROM education_details
        WHERE profile_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(&profile.id)
    .fetch_all(&mut *conn)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(ProfileAggregate {
        profile,
        education_details,
    })
}

async fn upsert_profile(
    conn: &mut SqliteConnection,
    profile: &JobSeekerProfile,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO job_seeker_profiles (
            id, user_id, name, email, mobile, status, gender, dob, education,
            work_experience, skills, resume_file_path, photo_file_path, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), COALESCE(?, datetime('now')))
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            mobile = excluded.mobile,
            status = excluded.status,
            gender = excluded.gender,
            dob = excluded.dob,
            education = excluded.education,
            work_experience = excluded.work_experience,
            skills = excluded.skills,
            resume_file_path = excluded.resume_file_path,
            photo_file_path = excluded.photo_file_path,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.user_id)
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(&profile.mobile)
    .bind(profile.status.map(|s| s.as_str()))
    .bind(profile.gender.map(|g| g.as_str()))
    .bind(profile.dob.map(|d| d.format("%Y-%m-%d").to_string()))
    .bind(&profile.education)
    .bind(&profile.work_experience)
    .bind(&profile.skills)
    .bind(&profile.resume_file_path)
    .bind(&profile.photo_file_path)
    .bind(&profile.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(())
}

async fn replace_education_details(
    conn: &mut SqliteConnection,
    aggregate: &ProfileAggregate,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM education_details WHERE profile_id = ?")
        .bind(&aggregate.profile.id)
        .execute(&mut *conn)
        .await
        .map_err(ApiError::DatabaseError)?;

    for detail in &aggregate.education_details {
        sqlx::query(
            r#"
            INSERT INTO education_details (
                id, profile_id, position, qualification, specialization, year_of_passing
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&detail.id)
        .bind(&detail.profile_id)
        .bind(detail.position)
        .bind(&detail.qualification)
        .bind(&detail.specialization)
        .bind(detail.year_of_passing)
        .execute(&mut *conn)
        .await
        .map_err(ApiError::DatabaseError)?;
    }

    Ok(())
}
