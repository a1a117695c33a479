//! Hunter model - registered accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Longest stored email, in characters, after normalization.
pub const HUNTER_EMAIL_MAX_LEN: usize = 100;

/// Hunter entity as stored. Holds the password digest, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Hunter {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Hunter {
    /// Convert to sanitized response (no digest).
    pub fn sanitized(&self) -> HunterResponse {
        HunterResponse::from(self.clone())
    }
}

/// Input for inserting a hunter. The digest is computed by the caller.
#[derive(Debug, Clone)]
pub struct NewHunter {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewHunter {
    pub fn into_hunter(self, id: i32) -> Hunter {
        Hunter {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

/// Hunter as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HunterResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Spike Spiegel")]
    pub name: String,
    #[schema(example = "spike@bebop.example")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Hunter> for HunterResponse {
    fn from(h: Hunter) -> Self {
        Self {
            id: h.id,
            name: h.name,
            email: h.email,
            created_at: h.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_hunter_has_no_digest() {
        let hunter = Hunter {
            id: 7,
            name: "Faye".to_string(),
            email: "faye@bebop.example".to_string(),
            password_hash: "c2VjcmV0LWRpZ2VzdA==".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(hunter.sanitized()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["id"], 7);
        assert_eq!(object["email"], "faye@bebop.example");
        assert!(object.contains_key("createdAt"));
        assert!(!object.keys().any(|k| k.to_lowercase().contains("password")));
        assert!(!json.to_string().contains("c2VjcmV0LWRpZ2VzdA=="));
    }
}
