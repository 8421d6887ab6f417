// src/profile/mapping.rs
//! Conversions between the wire DTO and the persisted profile aggregate

use chrono::NaiveDate;

use super::models::{
    EducationDetail, EducationDetailDto, ExperienceStatus, Gender, InvalidEnumValue,
    JobSeekerProfile, JobSeekerProfileDto, JobSeekerRegisterRequest, ProfileAggregate,
};
use crate::auth::User;
use crate::common::generate_education_id;

const PLACEHOLDER_DOB: (i32, u32, u32) = (1990, 1, 1);

pub fn to_dto(aggregate: &ProfileAggregate) -> JobSeekerProfileDto {
    let profile = &aggregate.profile;

    JobSeekerProfileDto {
        id: Some(profile.id.clone()),
        name: profile.name.clone(),
        email: profile.email.clone(),
        mobile: profile.mobile.clone(),
        status: profile.status.map(|s| s.to_string()),
        gender: profile.gender.map(|g| g.to_string()),
        dob: profile.dob,
        education: profile.education.clone(),
        work_experience: profile.work_experience.clone(),
        skills: profile.skills.clone(),
        resume_file_path: profile.resume_file_path.clone(),
        photo_file_path: profile.photo_file_path.clone(),
        education_details: aggregate
            .education_details
            .iter()
            .map(education_to_dto)
            .collect(),
    }
}

fn education_to_dto(detail: &EducationDetail) -> EducationDetailDto {
    EducationDetailDto {
        id: Some(detail.id.clone()),
        qualification: detail.qualification.clone(),
        specialization: detail.specialization.clone(),
        year_of_passing: detail.year_of_passing,
    }
}

/// Overwrite the aggregate with the DTO's contents.
///
/// Scalar fields are replaced wholesale. Status and gender are only changed
/// when present in the DTO. The education details are replaced by new
/// children built from the DTO list; incoming ids are ignored. Nothing is
/// modified when an enum value fails to parse.
pub fn apply_update(
    aggregate: &mut ProfileAggregate,
    dto: &JobSeekerProfileDto,
) -> Result<(), InvalidEnumValue> {
    let status = dto
        .status
        .as_deref()
        .map(str::parse::<ExperienceStatus>)
        .transpose()?;
    let gender = dto.gender.as_deref().map(str::parse::<Gender>).transpose()?;

    let profile = &mut aggregate.profile;
    profile.name = dto.name.clone();
    profile.email = dto.email.clone();
    profile.mobile = dto.mobile.clone();
    if status.is_some() {
        profile.status = status;
    }
    if gender.is_some() {
        profile.gender = gender;
    }
    profile.dob = dto.dob;
    profile.education = dto.education.clone();
    profile.work_experience = dto.work_experience.clone();
    profile.skills = dto.skills.clone();
    profile.resume_file_path = non_blank(dto.resume_file_path.as_deref());
    profile.photo_file_path = non_blank(dto.photo_file_path.as_deref());

    aggregate.replace_children(&dto.education_details);

    Ok(())
}

impl ProfileAggregate {
    /// Drop every existing education detail and attach fresh ones built from
    /// `incoming`, in order.
    pub fn replace_children(&mut self, incoming: &[EducationDetailDto]) {
        let profile_id = self.profile.id.clone();

        self.education_details = incoming
            .iter()
            .enumerate()
            .map(|(position, dto)| EducationDetail {
                id: generate_education_id(),
                profile_id: profile_id.clone(),
                position: position as i64,
                qualification: dto.qualification.clone(),
                specialization: dto.specialization.clone(),
                year_of_passing: dto.year_of_passing,
            })
            .collect();
    }
}

/// Build a new profile from a registration payload.
pub fn from_registration(
    profile_id: String,
    user: &User,
    request: &JobSeekerRegisterRequest,
) -> Result<JobSeekerProfile, InvalidEnumValue> {
    let status = request.status.parse::<ExperienceStatus>()?;
    let gender = request.gender.parse::<Gender>()?;

    Ok(JobSeekerProfile {
        name: Some(request.name.clone()),
        email: Some(request.email.clone()),
        mobile: Some(request.mobile.clone()),
        status: Some(status),
        gender: Some(gender),
        dob: request.dob,
        education: request.education.clone(),
        work_experience: request.work_experience.clone(),
        skills: request.skills.clone(),
        resume_file_path: non_blank(request.resume_file_path.as_deref()),
        photo_file_path: non_blank(request.photo_file_path.as_deref()),
        ..JobSeekerProfile::new(profile_id, user.id.clone())
    })
}

/// The profile created on first access for a user who never registered one.
pub fn placeholder(profile_id: String, user: &User) -> JobSeekerProfile {
    let email = if user.email.trim().is_empty() {
        "Please Update Email".to_string()
    } else {
        user.email.clone()
    };
    let (year, month, day) = PLACEHOLDER_DOB;

    JobSeekerProfile {
        name: Some("Please Update Name".to_string()),
        email: Some(email),
        mobile: Some("Please Update Mobile".to_string()),
        status: Some(ExperienceStatus::Fresher),
        gender: Some(Gender::Other),
        dob: NaiveDate::from_ymd_opt(year, month, day),
        education: Some("Please Update Education".to_string()),
        work_experience: Some("Please Update Work Experience".to_string()),
        skills: Some("Please Update Skills".to_string()),
        ..JobSeekerProfile::new(profile_id, user.id.clone())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "U_TEST01".to_string(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            created_at: None,
        }
    }

    fn aggregate_with_two_details() -> ProfileAggregate {
        let mut aggregate = ProfileAggregate {
            profile: placeholder("P_TEST01".to_string(), &user()),
            education_details: Vec::new(),
        };
        aggregate.replace_children(&[
            EducationDetailDto {
                qualification: Some("B.Tech".to_string()),
                specialization: Some("CSE".to_string()),
                year_of_passing: Some(2019),
                ..Default::default()
            },
            EducationDetailDto {
                qualification: Some("M.Tech".to_string()),
                specialization: Some("AI".to_string()),
                year_of_passing: Some(2021),
                ..Default::default()
            },
        ]);
        aggregate
    }

    #[test]
    fn test_to_dto_transcribes_fields() {
        let aggregate = aggregate_with_two_details();
        let dto = to_dto(&aggregate);

        assert_eq!(dto.id.as_deref(), Some("P_TEST01"));
        assert_eq!(dto.status.as_deref(), Some("FRESHER"));
        assert_eq!(dto.gender.as_deref(), Some("OTHER"));
        assert_eq!(dto.dob, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(dto.education_details.len(), 2);
        assert_eq!(dto.education_details[1].qualification.as_deref(), Some("M.Tech"));
        assert_eq!(
            dto.education_details[0].id.as_deref(),
            Some(aggregate.education_details[0].id.as_str())
        );
    }

    #[test]
    fn test_apply_update_replaces_children() {
        let mut aggregate = aggregate_with_two_details();
        let old_ids: Vec<String> = aggregate
            .education_details
            .iter()
            .map(|d| d.id.clone())
            .collect();

        let dto = JobSeekerProfileDto {
            name: Some("Asha Rao".to_string()),
            education_details: vec![EducationDetailDto {
                id: Some(old_ids[0].clone()),
                qualification: Some("MBA".to_string()),
                specialization: None,
                year_of_passing: Some(2024),
            }],
            ..Default::default()
        };

        apply_update(&mut aggregate, &dto).unwrap();

        assert_eq!(aggregate.education_details.len(), 1);
        let detail = &aggregate.education_details[0];
        assert_eq!(detail.qualification.as_deref(), Some("MBA"));
        assert_eq!(detail.profile_id, "P_TEST01");
        assert_eq!(detail.position, 0);
        assert!(!old_ids.contains(&detail.id));
    }

    #[test]
    fn test_apply_update_is_wholesale_for_scalars() {
        let mut aggregate = aggregate_with_two_details();
        let dto = JobSeekerProfileDto {
            name: Some("Asha".to_string()),
            resume_file_path: Some("".to_string()),
            ..Default::default()
        };

        apply_update(&mut aggregate, &dto).unwrap();

        let profile = &aggregate.profile;
        assert_eq!(profile.name.as_deref(), Some("Asha"));
        assert_eq!(profile.mobile, None);
        assert_eq!(profile.skills, None);
        assert_eq!(profile.dob, None);
        assert_eq!(profile.resume_file_path, None);
        // Absent enums keep their current value
        assert_eq!(profile.status, Some(ExperienceStatus::Fresher));
        assert_eq!(profile.gender, Some(Gender::Other));
        assert!(aggregate.education_details.is_empty());
    }

    #[test]
    fn test_apply_update_rejects_unknown_enum_without_changes() {
        let mut aggregate = aggregate_with_two_details();
        let before = aggregate.clone();

        let dto = JobSeekerProfileDto {
            name: Some("Changed".to_string()),
            status: Some("fresher".to_string()),
            ..Default::default()
        };

        let err = apply_update(&mut aggregate, &dto).unwrap_err();
        assert_eq!(err.field, "status");
        assert_eq!(aggregate, before);

        let dto = JobSeekerProfileDto {
            gender: Some("UNKNOWN".to_string()),
            ..Default::default()
        };
        let err = apply_update(&mut aggregate, &dto).unwrap_err();
        assert_eq!(err.field, "gender");
    }

    #[test]
    fn test_apply_update_parses_enums() {
        let mut aggregate = aggregate_with_two_details();
        let dto = JobSeekerProfileDto {
            status: Some("EXPERIENCED".to_string()),
            gender: Some("FEMALE".to_string()),
            ..Default::default()
        };

        apply_update(&mut aggregate, &dto).unwrap();
        assert_eq!(aggregate.profile.status, Some(ExperienceStatus::Experienced));
        assert_eq!(aggregate.profile.gender, Some(Gender::Female));
    }

    #[test]
    fn test_from_registration() {
        let request = JobSeekerRegisterRequest {
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            mobile: "9876543210".to_string(),
            status: "EXPERIENCED".to_string(),
            gender: "FEMALE".to_string(),
            dob: NaiveDate::from_ymd_opt(1998, 4, 12),
            education: Some("B.Tech".to_string()),
            work_experience: Some("2 years".to_string()),
            skills: Some("Rust, SQL".to_string()),
            resume_file_path: Some("resumes/abc.pdf".to_string()),
            photo_file_path: None,
        };

        let profile = from_registration("P_NEW001".to_string(), &user(), &request).unwrap();
        assert_eq!(profile.user_id, "U_TEST01");
        assert_eq!(profile.status, Some(ExperienceStatus::Experienced));
        assert_eq!(profile.resume_file_path.as_deref(), Some("resumes/abc.pdf"));

        let bad = JobSeekerRegisterRequest {
            gender: "Female".to_string(),
            ..request
        };
        assert!(from_registration("P_NEW002".to_string(), &user(), &bad).is_err());
    }

    #[test]
    fn test_placeholder_uses_user_email() {
        let profile = placeholder("P_X".to_string(), &user());
        assert_eq!(profile.email.as_deref(), Some("asha@example.com"));
        assert_eq!(profile.name.as_deref(), Some("Please Update Name"));

        let no_email = User {
            email: String::new(),
            ..user()
        };
        let profile = placeholder("P_Y".to_string(), &no_email);
        assert_eq!(profile.email.as_deref(), Some("Please Update Email"));
    }
}
