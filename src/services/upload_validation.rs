// src/services/upload_validation.rs

use super::file_storage::StorageError;

/// Check an uploaded file's extension against an allow-list.
///
/// The extension is whatever follows the last `.`, lowercased. A name with
/// no `.` has an empty extension, which no allow-list contains.
pub fn validate_extension(
    original_filename: Option<&str>,
    allowed: &'static [&'static str],
) -> Result<String, StorageError> {
    let filename = original_filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(StorageError::MissingFilename)?;

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if allowed.iter().any(|candidate| *candidate == extension) {
        Ok(extension)
    } else {
        Err(StorageError::UnsupportedType { allowed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTOS: &[&str] = &["jpg", "jpeg", "png", "gif"];
    const RESUMES: &[&str] = &["pdf", "doc", "docx"];

    #[test]
    fn test_lowercases_extension() {
        assert_eq!(validate_extension(Some("CV.PDF"), RESUMES).unwrap(), "pdf");
        assert_eq!(validate_extension(Some("me.JpEg"), PHOTOS).unwrap(), "jpeg");
    }

    #[test]
    fn test_uses_last_dot() {
        assert_eq!(
            validate_extension(Some("resume.final.docx"), RESUMES).unwrap(),
            "docx"
        );
        assert!(validate_extension(Some("photo.png.exe"), PHOTOS).is_err());
    }

    #[test]
    fn test_missing_filename() {
        assert!(matches!(
            validate_extension(None, RESUMES),
            Err(StorageError::MissingFilename)
        ));
        assert!(matches!(
            validate_extension(Some("   "), RESUMES),
            Err(StorageError::MissingFilename)
        ));
    }

    #[test]
    fn test_no_extension_is_unsupported() {
        for name in ["pdf", "resume", "resume."] {
            assert!(
                matches!(
                    validate_extension(Some(name), RESUMES),
                    Err(StorageError::UnsupportedType { .. })
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_error_names_allowed_types() {
        let err = validate_extension(Some("image.exe"), PHOTOS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Allowed types: jpg, jpeg, png, gif"
        );
    }
}
