use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self { ModelError::Db(e.to_string()) }
}

/// Reject blank required text fields.
pub fn require(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

/// Upper-case `value` and check it against a closed set of labels.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<String, ModelError> {
    let v = value.trim().to_ascii_uppercase();
    if allowed.contains(&v.as_str()) {
        Ok(v)
    } else {
        Err(ModelError::Validation(format!("invalid {field}: {value} (expected one of {})", allowed.join(", "))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_normalizes_case() {
        assert_eq!(one_of("status", " present ", &["PRESENT", "ABSENT"]).unwrap(), "PRESENT");
        assert!(one_of("status", "gone", &["PRESENT", "ABSENT"]).is_err());
    }

    #[test]
    fn require_rejects_whitespace() {
        assert!(require("name", "   ").is_err());
        assert!(require("name", "x").is_ok());
    }
}
