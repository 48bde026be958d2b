//! Checkout customer form state and validation.

use partshub_core::{Email, EmailError, Phone, PhoneError};
use thiserror::Error;

/// Mutable checkout form state.
///
/// All fields except `notes` are required; validation runs before
/// submission and never lets a partially filled form through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub ward: String,
    pub notes: String,
}

/// One user-correctable problem with the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    InvalidEmail(EmailError),
    #[error("invalid phone number: {0}")]
    InvalidPhone(PhoneError),
    #[error("cart is empty")]
    EmptyCart,
}

impl CustomerInfo {
    /// Validate the form, returning every issue found.
    ///
    /// # Errors
    ///
    /// Returns the full enumerated list of missing or malformed fields so
    /// the UI can mark all of them at once.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for (label, value) in [
            ("full name", &self.full_name),
            ("address", &self.address),
            ("city", &self.city),
            ("district", &self.district),
            ("ward", &self.ward),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::MissingField(label));
            }
        }

        if self.email.trim().is_empty() {
            issues.push(ValidationIssue::MissingField("email"));
        } else if let Err(e) = Email::parse(&self.email) {
            issues.push(ValidationIssue::InvalidEmail(e));
        }

        if self.phone.trim().is_empty() {
            issues.push(ValidationIssue::MissingField("phone"));
        } else if let Err(e) = Phone::parse(&self.phone) {
            issues.push(ValidationIssue::InvalidPhone(e));
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_info() -> CustomerInfo {
        CustomerInfo {
            full_name: "Nguyen Van An".to_string(),
            email: "an@example.com".to_string(),
            phone: "0912345678".to_string(),
            address: "1 Pham Van Dong".to_string(),
            city: "Hanoi".to_string(),
            district: "Cau Giay".to_string(),
            ward: "Dich Vong".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_info().validate().is_ok());
    }

    #[test]
    fn test_notes_are_optional() {
        let mut info = valid_info();
        info.notes = String::new();
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_each_required_field_blocks() {
        for field in ["full_name", "email", "phone", "address", "city", "district", "ward"] {
            let mut info = valid_info();
            match field {
                "full_name" => info.full_name.clear(),
                "email" => info.email.clear(),
                "phone" => info.phone.clear(),
                "address" => info.address.clear(),
                "city" => info.city.clear(),
                "district" => info.district.clear(),
                _ => info.ward.clear(),
            }
            let issues = info.validate().unwrap_err();
            assert_eq!(issues.len(), 1, "field {field} should produce one issue");
            assert!(matches!(issues[0], ValidationIssue::MissingField(_)));
        }
    }

    #[test]
    fn test_all_issues_enumerated() {
        let info = CustomerInfo::default();
        let issues = info.validate().unwrap_err();
        // 5 plain fields + email + phone
        assert_eq!(issues.len(), 7);
    }

    #[test]
    fn test_malformed_email_and_phone() {
        let mut info = valid_info();
        info.email = "not-an-email".to_string();
        info.phone = "123".to_string();
        let issues = info.validate().unwrap_err();
        assert!(issues.iter().any(|i| matches!(i, ValidationIssue::InvalidEmail(_))));
        assert!(issues.iter().any(|i| matches!(i, ValidationIssue::InvalidPhone(_))));
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut info = valid_info();
        info.city = "   ".to_string();
        let issues = info.validate().unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::MissingField("city")]);
    }
}
