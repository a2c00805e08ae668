// Validation utilities module
// Custom validator functions for booking-specific request rules

use validator::ValidationError;

/// Rejects strings that are empty or only whitespace
pub fn validate_non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

/// Validates that an identifier is strictly positive
pub fn validate_positive_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        Err(ValidationError::new("id_must_be_positive"))
    } else {
        Ok(())
    }
}
