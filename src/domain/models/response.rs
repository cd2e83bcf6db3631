use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_REASON_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    Maybe,
}

#[derive(Debug, Error)]
#[error("Unknown answer '{0}'")]
pub struct UnknownAnswer(pub String);

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Maybe => "maybe",
        }
    }
}

impl FromStr for Answer {
    type Err = UnknownAnswer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Answer::Yes),
            "no" => Ok(Answer::No),
            "maybe" => Ok(Answer::Maybe),
            other => Err(UnknownAnswer(other.to_string())),
        }
    }
}

impl TryFrom<String> for Answer {
    type Error = UnknownAnswer;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Response {
    pub id: String,
    pub invite_id: String,
    #[sqlx(try_from = "String")]
    pub answer: Answer,
    pub reason: Option<String>,
    pub responder_id: Option<String>,
    #[serde(skip_serializing, default)]
    pub device_token: String,
    pub created_at: DateTime<Utc>,
    /// Joined from the responder's profile when read back for the owner.
    #[sqlx(default)]
    #[serde(default)]
    pub responder_name: Option<String>,
}

/// Arguments of the submit-response operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub invite_id: String,
    pub device_token: String,
    pub answer: Answer,
    pub responder_id: Option<String>,
    pub reason: Option<String>,
}

impl Response {
    pub fn from_submission(submission: &SubmitResponse) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invite_id: submission.invite_id.clone(),
            answer: submission.answer,
            reason: submission.reason.clone(),
            responder_id: submission.responder_id.clone(),
            device_token: submission.device_token.clone(),
            created_at: Utc::now(),
            responder_name: None,
        }
    }
}

/// Trims the reason, drops it when blank and rejects it on anything but a refusal.
pub fn normalize_reason(answer: Answer, reason: Option<&str>) -> Result<Option<String>, String> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    match reason {
        None => Ok(None),
        Some(_) if answer != Answer::No => Err("A reason can only accompany a 'no' answer".to_string()),
        Some(r) if r.chars().count() > MAX_REASON_LEN => {
            Err(format!("Reason must be at most {} characters", MAX_REASON_LEN))
        }
        Some(r) => Ok(Some(r.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_parsing() {
        assert_eq!("maybe".parse::<Answer>().unwrap(), Answer::Maybe);
        assert!(Answer::try_from("perhaps".to_string()).is_err());
        assert_eq!(serde_json::to_string(&Answer::No).unwrap(), "\"no\"");
    }

    #[test]
    fn test_normalize_reason() {
        assert_eq!(normalize_reason(Answer::No, Some("  bad timing ")), Ok(Some("bad timing".into())));
        assert_eq!(normalize_reason(Answer::No, Some("   ")), Ok(None));
        assert_eq!(normalize_reason(Answer::Yes, None), Ok(None));
        assert!(normalize_reason(Answer::Yes, Some("because")).is_err());
        assert!(normalize_reason(Answer::No, Some(&"x".repeat(MAX_REASON_LEN + 1))).is_err());
    }
}
