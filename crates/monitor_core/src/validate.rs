use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("url is empty")]
    EmptyUrl,
    #[error("email is empty")]
    EmptyEmail,
    #[error("email has no '@'")]
    MalformedEmail,
}

/// Check a form submission before a job is created.
pub fn validate_submission(url: &str, email: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !email.contains('@') {
        return Err(ValidationError::MalformedEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_submission, ValidationError};

    #[test]
    fn rejects_blank_and_malformed_input() {
        assert_eq!(
            validate_submission("   ", "a@b.com"),
            Err(ValidationError::EmptyUrl)
        );
        assert_eq!(
            validate_submission("https://a.test", "\t"),
            Err(ValidationError::EmptyEmail)
        );
        assert_eq!(
            validate_submission("https://a.test", "ab.com"),
            Err(ValidationError::MalformedEmail)
        );
    }

    #[test]
    fn accepts_anything_with_an_at_sign() {
        assert_eq!(validate_submission("not a url", "@"), Ok(()));
    }
}
