//! Input checks run before any request leaves the device.
//!
//! Each check reports the offending [`Field`] so the presenter can put the
//! cursor back where the user has to fix something.

use crate::constants::{MAX_NAME_LEN, MIN_PASSWORD_LEN};
use crate::error::{Field, QuoteVaultError, Result};

pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(QuoteVaultError::validation(
            Field::Email,
            "Please enter your email",
        ));
    }
    if !is_valid_email(email) {
        return Err(QuoteVaultError::validation(
            Field::Email,
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(QuoteVaultError::validation(
            Field::Password,
            "Please enter your password",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(QuoteVaultError::validation(
            Field::Password,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(QuoteVaultError::validation(
            Field::ConfirmPassword,
            "Passwords do not match",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    check_name(name, Field::Name, "Please enter your name")
}

pub fn validate_collection_name(name: &str) -> Result<()> {
    check_name(name, Field::CollectionName, "Please enter a collection name")
}

fn check_name(name: &str, field: Field, empty_message: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QuoteVaultError::validation(field, empty_message));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(QuoteVaultError::validation(
            field,
            format!("Name must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

/// Sign-up form as entered by the user.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Reports the first invalid field, top to bottom.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_password_confirmation(&self.password, &self.confirm_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("  reader@mail.example.org ").is_ok());

        for bad in ["", "   ", "reader", "@example.com", "reader@", "reader@example", "a@b..c", "a b@c.d"] {
            let err = validate_email(bad).unwrap_err();
            assert_eq!(err.field(), Some(Field::Email), "{bad:?}");
        }
    }

    #[test]
    fn password_length() {
        assert!(validate_password("secret").is_ok());
        let err = validate_password("12345").unwrap_err();
        assert_eq!(err.field(), Some(Field::Password));
        assert!(err.to_string().contains('6'));
    }

    #[test]
    fn sign_up_reports_first_failure() {
        let mut form = SignUpForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "analytical".into(),
            confirm_password: "analytic".into(),
        };
        assert_eq!(
            form.validate().unwrap_err().field(),
            Some(Field::ConfirmPassword)
        );

        form.email = "nope".into();
        assert_eq!(form.validate().unwrap_err().field(), Some(Field::Email));

        form.name = " ".into();
        assert_eq!(form.validate().unwrap_err().field(), Some(Field::Name));
    }

    #[test]
    fn collection_name_limits() {
        assert!(validate_collection_name("Stoics").is_ok());
        assert!(validate_collection_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert_eq!(
            validate_collection_name("").unwrap_err().field(),
            Some(Field::CollectionName)
        );
    }
}
