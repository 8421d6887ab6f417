// src/profile/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::models::*;
use crate::common::{ValidationResult, Validator};
use crate::services::Category;

// ============================================================================
// Registration / Profile Validators
// ============================================================================

pub struct RegistrationValidator;

impl Validator<JobSeekerRegisterRequest> for RegistrationValidator {
    fn validate(&self, data: &JobSeekerRegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate username
        if data.username.trim().is_empty() {
            result.add_error("username", "Username is required");
        } else if data.username.chars().count() > 50 {
            result.add_error("username", "Username must be at most 50 characters");
        } else if !data
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            result.add_error(
                "username",
                "Username may only contain letters, digits, '_', '-' and '.'",
            );
        }

        // Validate name
        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Name must be less than 255 characters");
        }

        // Validate email
        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(&data.email) {
            result.add_error("email", "Email format is invalid");
        }

        // Validate mobile
        if !is_valid_mobile(&data.mobile) {
            result.add_error("mobile", "Mobile number is invalid");
        }

        if data.status.trim().is_empty() {
            result.add_error("status", "Status is required");
        }
        if data.gender.trim().is_empty() {
            result.add_error("gender", "Gender is required");
        }

        check_text_lengths(
            &mut result,
            &[
                ("education", &data.education),
                ("workExperience", &data.work_experience),
                ("skills", &data.skills),
            ],
        );
        check_file_reference(
            &mut result,
            "resumeFilePath",
            data.resume_file_path.as_deref(),
            Category::Resumes,
        );
        check_file_reference(
            &mut result,
            "photoFilePath",
            data.photo_file_path.as_deref(),
            Category::Photos,
        );

        result
    }
}

pub struct ProfileUpdateValidator;

impl Validator<JobSeekerProfileDto> for ProfileUpdateValidator {
    fn validate(&self, data: &JobSeekerProfileDto) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            if name.len() > 255 {
                result.add_error("name", "Name must be less than 255 characters");
            }
        }

        if let Some(email) = &data.email {
            if email.len() > 255 {
                result.add_error("email", "Email must be less than 255 characters");
            }
        }

        if let Some(mobile) = &data.mobile {
            if mobile.len() > 50 {
                result.add_error("mobile", "Mobile must be less than 50 characters");
            }
        }

        check_text_lengths(
            &mut result,
            &[
                ("education", &data.education),
                ("workExperience", &data.work_experience),
                ("skills", &data.skills),
            ],
        );

        for (index, detail) in data.education_details.iter().enumerate() {
            if let Some(year) = detail.year_of_passing {
                if !(1900..=2100).contains(&year) {
                    result.add_error(
                        &format!("educationDetails[{}].yearOfPassing", index),
                        "Year of passing must be between 1900 and 2100",
                    );
                }
            }
        }

        check_file_reference(
            &mut result,
            "resumeFilePath",
            data.resume_file_path.as_deref(),
            Category::Resumes,
        );
        check_file_reference(
            &mut result,
            "photoFilePath",
            data.photo_file_path.as_deref(),
            Category::Photos,
        );

        result
    }
}

fn check_text_lengths(result: &mut ValidationResult, fields: &[(&str, &Option<String>)]) {
    for (field, value) in fields {
        if let Some(value) = value {
            if value.len() > 2000 {
                result.add_error(field, "Must be less than 2000 characters");
            }
        }
    }
}

/// A stored reference must point into the category's own directory.
fn check_file_reference(
    result: &mut ValidationResult,
    field: &str,
    reference: Option<&str>,
    category: Category,
) {
    let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
        return;
    };

    let well_formed = match reference.split_once('/') {
        Some((dir, name)) => {
            dir == category.dir_name()
                && !name.is_empty()
                && name != ".."
                && !name.contains(['/', '\\', '\0'])
        }
        None => false,
    };

    if !well_formed {
        result.add_error(
            field,
            &format!("Must be a stored {} reference", category.dir_name()),
        );
    }
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
        })
        .is_match(email.trim())
}

/// Optional leading '+', then 1 to 16 digits with no leading zero. Spaces are
/// ignored.
fn is_valid_mobile(mobile: &str) -> bool {
    static MOBILE: OnceLock<Regex> = OnceLock::new();
    let compact: String = mobile.chars().filter(|c| !c.is_whitespace()).collect();
    MOBILE
        .get_or_init(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("mobile pattern is valid"))
        .is_match(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_format() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("+919876543210"));
        assert!(is_valid_mobile("1"));
        assert!(is_valid_mobile("+91 98765 43210"));
        assert!(!is_valid_mobile(""));
        assert!(!is_valid_mobile("+"));
        assert!(!is_valid_mobile("0123456789"));
        assert!(!is_valid_mobile("98765-43210"));
        assert!(!is_valid_mobile("12345678901234567"));
        assert!(!is_valid_mobile("Please Update Mobile"));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("asha@example.com"));
        assert!(!is_valid_email("asha.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("asha@example"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("asha @example.com"));
    }

    #[test]
    fn test_file_reference_shape() {
        let mut result = ValidationResult::new();
        check_file_reference(&mut result, "f", Some("resumes/a.pdf"), Category::Resumes);
        check_file_reference(&mut result, "f", Some(""), Category::Resumes);
        check_file_reference(&mut result, "f", None, Category::Photos);
        assert!(result.is_valid);

        for bad in ["photos/a.png", "resumes/", "resumes/../x", "a.pdf", "resumes/a/b.pdf"] {
            let mut result = ValidationResult::new();
            check_file_reference(&mut result, "f", Some(bad), Category::Resumes);
            assert!(!result.is_valid, "{} should be rejected", bad);
        }
    }
}
