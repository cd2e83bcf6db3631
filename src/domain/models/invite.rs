use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::domain::models::response::Response;

pub const SHORT_CODE_LEN: usize = 10;
const SHORT_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_MESSAGE: &str = "Will you be my Valentine?";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Invite {
    pub id: String,
    pub creator_id: String,
    pub short_code: String,
    pub message: String,
    pub recipient_name: String,
    pub is_public: bool,
    pub theme: Option<String>,
    pub occasion: Option<String>,
    #[serde(skip_serializing, default)]
    pub device_token: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewInviteParams {
    pub creator_id: String,
    pub recipient_name: String,
    pub message: String,
    pub is_public: bool,
    pub theme: Option<Theme>,
    pub occasion: Option<Occasion>,
}

impl Invite {
    pub fn new(params: NewInviteParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            creator_id: params.creator_id,
            short_code: generate_short_code(),
            message: params.message,
            recipient_name: params.recipient_name,
            is_public: params.is_public,
            theme: params.theme.map(|t| t.as_str().to_string()),
            occasion: params.occasion.map(|o| o.as_str().to_string()),
            device_token: None,
            opened_at: None,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn theme(&self) -> Theme {
        self.theme.as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }
}

/// URL-safe code used in the public link.
pub fn generate_short_code() -> String {
    let mut rng = rand::thread_rng();
    (0..SHORT_CODE_LEN)
        .map(|_| SHORT_CODE_ALPHABET[rng.gen_range(0..SHORT_CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Classic,
    Scratch,
    Midnight,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Scratch => "scratch",
            Theme::Midnight => "midnight",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Theme::Classic),
            "scratch" => Ok(Theme::Scratch),
            "midnight" => Ok(Theme::Midnight),
            other => Err(format!("Unknown theme '{}'", other)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    Valentine,
    FirstDate,
    Anniversary,
    Birthday,
    JustBecause,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Valentine => "valentine",
            Occasion::FirstDate => "first_date",
            Occasion::Anniversary => "anniversary",
            Occasion::Birthday => "birthday",
            Occasion::JustBecause => "just_because",
        }
    }
}

impl FromStr for Occasion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valentine" => Ok(Occasion::Valentine),
            "first_date" => Ok(Occasion::FirstDate),
            "anniversary" => Ok(Occasion::Anniversary),
            "birthday" => Ok(Occasion::Birthday),
            "just_because" => Ok(Occasion::JustBecause),
            other => Err(format!("Unknown occasion '{}'", other)),
        }
    }
}

/// An invite together with every response recorded against it, oldest first.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InviteWithResponses {
    #[serde(flatten)]
    pub invite: Invite,
    pub responses: Vec<Response>,
}
