//! Form validation that runs before any network dispatch.
//!
//! A failed check here never reaches the server; the CLI surfaces the
//! message inline, the same way the original forms did.

use crate::model::TransactionPayload;

/// User-facing validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingFields,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,

    #[error("Please fill all fields")]
    IncompleteTransaction,

    #[error("Category name cannot be empty")]
    EmptyCategoryName,
}

/// Checks shared by login and register: non-blank credentials, an `@` in
/// the email, and a minimum password length.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if password.len() < 6 {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Register additionally requires a display name.
pub fn validate_register(
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if full_name.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    validate_login(email, password)
}

/// A transaction needs a name, a positive amount, and a category before it
/// may be submitted. (The date is structurally required by the payload
/// type, so there is nothing left to check for it here.)
pub fn validate_transaction(payload: &TransactionPayload) -> Result<(), ValidationError> {
    if payload.name.trim().is_empty() || payload.amount <= 0.0 || payload.category_id <= 0 {
        return Err(ValidationError::IncompleteTransaction);
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyCategoryName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_login_rules() {
        assert_eq!(validate_login("", "secret1"), Err(ValidationError::MissingFields));
        assert_eq!(validate_login("a@b.com", "  "), Err(ValidationError::MissingFields));
        assert_eq!(
            validate_login("not-an-email", "secret1"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_login("a@b.com", "short"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(validate_login("a@b.com", "secret1"), Ok(()));
    }

    #[test]
    fn test_register_requires_name() {
        assert_eq!(
            validate_register("  ", "a@b.com", "secret1"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(validate_register("Ada", "a@b.com", "secret1"), Ok(()));
    }

    #[test]
    fn test_transaction_rules() {
        let mut p = TransactionPayload {
            name: "Groceries".to_string(),
            amount: 42.0,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            category_id: 3,
            icon: None,
        };
        assert_eq!(validate_transaction(&p), Ok(()));

        p.amount = 0.0;
        assert_eq!(
            validate_transaction(&p),
            Err(ValidationError::IncompleteTransaction)
        );

        p.amount = 42.0;
        p.name = "".to_string();
        assert_eq!(
            validate_transaction(&p),
            Err(ValidationError::IncompleteTransaction)
        );
    }

    #[test]
    fn test_category_name_rule() {
        assert_eq!(
            validate_category_name(""),
            Err(ValidationError::EmptyCategoryName)
        );
        assert_eq!(validate_category_name("Food"), Ok(()));
    }
}
