//! Messages sent through the site's contact form.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingField("message"));
        }

        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !well_formed {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }

        Ok(())
    }

    pub fn subject(&self) -> String {
        format!("[Portfolio Contact] Message from {}", self.name.trim())
    }

    pub fn body(&self) -> String {
        format!(
            "You have received a new message from your portfolio website.\n\n\
             Name: {}\n\
             Email: {}\n\n\
             Message:\n{}\n",
            self.name.trim(),
            self.email.trim(),
            self.message.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, email: &str, text: &str) -> ContactMessage {
        ContactMessage {
            name: name.into(),
            email: email.into(),
            message: text.into(),
        }
    }

    #[test]
    fn test_all_fields_required() {
        assert_eq!(
            message("", "a@b.c", "Hi").validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            message("Ann", " ", "Hi").validate(),
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(
            message("Ann", "a@b.c", "").validate(),
            Err(ValidationError::MissingField("message"))
        );
        assert!(message("Ann", "ann@example.com", "Lesson inquiry").validate().is_ok());
    }

    #[test]
    fn test_rejects_email_without_at() {
        assert_eq!(
            message("Ann", "ann.example.com", "Hi").validate(),
            Err(ValidationError::InvalidEmail("ann.example.com".into()))
        );
    }

    #[test]
    fn test_subject_and_body() {
        let msg = message("Ann", "ann@example.com", "Do you teach beginners?");

        assert_eq!(msg.subject(), "[Portfolio Contact] Message from Ann");
        let body = msg.body();
        assert!(body.contains("Email: ann@example.com"));
        assert!(body.ends_with("Do you teach beginners?\n"));
    }
}
