use serde::{Deserialize, Serialize};

use crate::domain::models::invite::{NewInviteParams, Occasion, Theme, DEFAULT_MESSAGE};
use crate::domain::models::response::Answer;
use crate::error::AppError;

pub const MAX_RECIPIENT_LEN: usize = 80;
pub const MAX_MESSAGE_LEN: usize = 500;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters", MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateInviteRequest {
    pub recipient_name: String,
    pub message: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub theme: Option<Theme>,
    pub occasion: Option<Occasion>,
}

impl CreateInviteRequest {
    pub fn into_params(self, creator_id: String) -> Result<NewInviteParams, AppError> {
        let recipient_name = self.recipient_name.trim().to_string();
        if recipient_name.is_empty() {
            return Err(AppError::Validation("Recipient name is required".into()));
        }
        if recipient_name.chars().count() > MAX_RECIPIENT_LEN {
            return Err(AppError::Validation(format!(
                "Recipient name must be at most {} characters", MAX_RECIPIENT_LEN
            )));
        }

        let message = match self.message {
            Some(m) => m.trim().to_string(),
            None => DEFAULT_MESSAGE.to_string(),
        };
        if message.is_empty() {
            return Err(AppError::Validation("Message is required".into()));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::Validation(format!(
                "Message must be at most {} characters", MAX_MESSAGE_LEN
            )));
        }

        Ok(NewInviteParams {
            creator_id,
            recipient_name,
            message,
            is_public: self.is_public,
            theme: self.theme,
            occasion: self.occasion,
        })
    }
}

/// Body of a response submission. Also sent by the HTTP client.
#[derive(Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: Answer,
    pub reason: Option<String>,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email address".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(recipient: &str, message: Option<&str>) -> CreateInviteRequest {
        CreateInviteRequest {
            recipient_name: recipient.into(),
            message: message.map(Into::into),
            is_public: false,
            theme: None,
            occasion: None,
        }
    }

    #[test]
    fn test_message_defaults_when_omitted() {
        let params = request("  Sam ", None).into_params("c".into()).unwrap();
        assert_eq!(params.recipient_name, "Sam");
        assert_eq!(params.message, DEFAULT_MESSAGE);
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(request("   ", None).into_params("c".into()).is_err());
        assert!(request("Sam", Some("  ")).into_params("c".into()).is_err());
        assert!(request(&"x".repeat(81), None).into_params("c".into()).is_err());
        assert!(request("Sam", Some(&"x".repeat(501))).into_params("c".into()).is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("sam@example.com").is_ok());
        assert!(validate_email("sam@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("sam example@x.com").is_err());
        assert!(validate_email("sam").is_err());
    }
}
