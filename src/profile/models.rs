// src/profile/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enumerations
// ============================================================================

/// Raised when status or gender text does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value '{value}'. Allowed values: {}", .allowed.join(", "))]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceStatus {
    Fresher,
    Experienced,
}

impl ExperienceStatus {
    const NAMES: &'static [&'static str] = &["FRESHER", "EXPERIENCED"];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceStatus::Fresher => "FRESHER",
            ExperienceStatus::Experienced => "EXPERIENCED",
        }
    }
}

impl FromStr for ExperienceStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FRESHER" => Ok(ExperienceStatus::Fresher),
            "EXPERIENCED" => Ok(ExperienceStatus::Experienced),
            other => Err(InvalidEnumValue {
                field: "status",
                value: other.to_string(),
                allowed: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for ExperienceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    const NAMES: &'static [&'static str] = &["MALE", "FEMALE", "OTHER"];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(InvalidEnumValue {
                field: "gender",
                value: other.to_string(),
                allowed: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Persisted Models
// ============================================================================

/// Job seeker profile row. The aggregate root for education details.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSeekerProfile {
    pub id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub status: Option<ExperienceStatus>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub skills: Option<String>,
    pub resume_file_path: Option<String>,
    pub photo_file_path: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl JobSeekerProfile {
    /// An empty profile owned by `user_id`
    pub fn new(id: String, user_id: String) -> Self {
        Self {
            id,
            user_id,
            name: None,
            email: None,
            mobile: None,
            status: None,
            gender: None,
            dob: None,
            education: None,
            work_experience: None,
            skills: None,
            resume_file_path: None,
            photo_file_path: None,
            created_at: None,
            updated_at: None,
        }
    }
}

// Status, gender and dob are stored as text and parsed on the way out.
impl<'r> FromRow<'r, SqliteRow> for JobSeekerProfile {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            mobile: row.try_get("mobile")?,
            status: parse_column(row, "status")?,
            gender: parse_column(row, "gender")?,
            dob: parse_column(row, "dob")?,
            education: row.try_get("education")?,
            work_experience: row.try_get("work_experience")?,
            skills: row.try_get("skills")?,
            resume_file_path: row.try_get("resume_file_path")?,
            photo_file_path: row.try_get("photo_file_path")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn parse_column<T>(row: &SqliteRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| {
        value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
    .transpose()
}

/// Education detail row, owned by exactly one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EducationDetail {
    pub id: String,
    pub profile_id: String,
    pub position: i64,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub year_of_passing: Option<i32>,
}

/// A profile together with the education details it owns
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileAggregate {
    pub profile: JobSeekerProfile,
    pub education_details: Vec<EducationDetail>,
}

// ============================================================================
// Wire Models
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationDetailDto {
    #[serde(default)]
    pub id: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub year_of_passing: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfileDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub status: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "crate::common::helpers::deserialize_optional_date")]
    pub dob: Option<NaiveDate>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub skills: Option<String>,
    pub resume_file_path: Option<String>,
    pub photo_file_path: Option<String>,
    #[serde(default)]
    pub education_details: Vec<EducationDetailDto>,
}

/// POST /api/auth/register/jobseeker payload. Any credential fields the
/// client sends are ignored; they belong to the identity service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerRegisterRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub mobile: String,
    pub status: String,
    pub gender: String,
    #[serde(default, deserialize_with = "crate::common::helpers::deserialize_optional_date")]
    pub dob: Option<NaiveDate>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub skills: Option<String>,
    pub resume_file_path: Option<String>,
    pub photo_file_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReferenceClearedResponse {
    pub message: String,
    pub file_deleted: bool,
}
