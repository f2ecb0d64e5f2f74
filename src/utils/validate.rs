use crate::error::AppError;

/// Trims `value` and fails when nothing is left.
pub fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Lower-cases and sanity checks an email address: one
/// `@` with something on both sides and a dot in the domain.
pub fn email(value: &str) -> Result<String, AppError> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!("invalid email address: {value}")));
    }
    Ok(email)
}

/// Empty optional text is stored as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalised() {
        assert_eq!(email(" Alice@Example.com ").unwrap(), "alice@example.com");
    }

    #[test]
    fn malformed_emails_fail() {
        for bad in ["", "alice", "alice@", "@example.com", "alice@example", "a@b@c.com"] {
            assert!(email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("name", "  Website ").unwrap(), "Website");
        assert!(required("name", "   ").is_err());
    }
}
