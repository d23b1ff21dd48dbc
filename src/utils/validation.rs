use crate::error::{RecError, RecResult};
use crate::models::RecommendationCriteria;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_TITLE_LEN: usize = 500;

pub fn validate_criteria(genre: &str, kind: &str, min_rating: &str) -> RecResult<RecommendationCriteria> {
    let min_rating: f64 = min_rating
        .trim()
        .parse()
        .map_err(|_| RecError::Validation(format!("Minimum rating must be a number, got {:?}", min_rating)))?;

    if !min_rating.is_finite() {
        return Err(RecError::Validation("Minimum rating must be a finite number".to_string()));
    }

    if genre.len() > 100 {
        return Err(RecError::Validation("Genre too long (max 100 characters)".to_string()));
    }

    Ok(RecommendationCriteria::new(genre.trim(), min_rating, kind))
}

pub fn validate_credentials(username: &str, password: &str) -> RecResult<()> {
    let length = username.chars().count();
    if length < MIN_USERNAME_LEN || length > MAX_USERNAME_LEN {
        return Err(RecError::Validation(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LEN, MAX_USERNAME_LEN
        )));
    }

    if username.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(RecError::Validation("Username cannot contain whitespace".to_string()));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RecError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

pub fn validate_title(title: &str) -> RecResult<&str> {
    if title.trim().is_empty() {
        return Err(RecError::Validation("Title cannot be empty".to_string()));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(RecError::Validation(format!("Title too long (max {} characters)", MAX_TITLE_LEN)));
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeFilter;

    #[test]
    fn test_validate_criteria() {
        let criteria = validate_criteria(" Comedy ", "All", "8.0").unwrap();
        assert_eq!(criteria.genre, "Comedy");
        assert_eq!(criteria.kind, TypeFilter::All);
        assert!((criteria.min_rating - 8.0).abs() < f64::EPSILON);

        assert!(validate_criteria("Comedy", "TV", "eight").is_err());
        assert!(validate_criteria("Comedy", "TV", "NaN").is_err());
        assert!(validate_criteria("Comedy", "TV", "inf").is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("alice", "secret1").is_ok());
        assert!(validate_credentials("al", "secret1").is_err());
        assert!(validate_credentials("alice smith", "secret1").is_err());
        assert!(validate_credentials("alice", "short").is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Naruto").is_ok());
        assert!(validate_title("   ").is_err());
    }
}
