use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Bounty, NewBounty, ThreatLevel, AMOUNT_MAX_LEN};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBountyRequest {
    #[validate(length(min = 1, max = 100, message = "Person name must be between 1 and 100 characters"))]
    #[schema(example = "Vicious")]
    pub person_name: String,

    /// A JSON number or a string such as `"$200000"` or `"1,250.50"`.
    #[serde(deserialize_with = "deserialize_amount")]
    #[schema(value_type = String, example = "$200000")]
    pub amount: Decimal,

    /// RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a bare date.
    #[serde(default, deserialize_with = "deserialize_spotted_date")]
    #[validate(required(message = "Spotted date is required"))]
    #[schema(value_type = String, example = "2077-12-20T00:00:00Z")]
    pub spotted_date: Option<DateTime<Utc>>,

    #[schema(example = "Syndicate lieutenant")]
    pub description: Option<String>,

    pub threat_level: Option<ThreatLevel>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateBountyRequest {
    /// Convert a validated request. `None` only if `spotted_date` was missing.
    pub fn into_new_bounty(self) -> Option<NewBounty> {
        Some(NewBounty {
            person_name: self.person_name,
            amount: self.amount,
            spotted_date: self.spotted_date?,
            description: self.description,
            threat_level: self.threat_level,
            is_active: self.is_active,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

/// Parse an amount, tolerating a leading `$` and thousands separators.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Amount is required".to_string());
    }
    if trimmed.len() > AMOUNT_MAX_LEN {
        return Err(format!(
            "Amount must be at most {} characters",
            AMOUNT_MAX_LEN
        ));
    }

    let cleaned: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).map_err(|_| format!("Invalid amount '{}'", raw))
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(text) => text,
        RawAmount::Number(number) => number.to_string(),
    };
    parse_amount(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_spotted_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid spotted date '{}'", raw))
}

fn deserialize_spotted_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_spotted_date(&raw))
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BountyResponse {
    pub success: bool,
    #[schema(example = "Bounty retrieved")]
    pub message: String,
    pub bounty: Bounty,
}

impl BountyResponse {
    pub fn new(message: impl Into<String>, bounty: Bounty) -> Self {
        Self {
            success: true,
            message: message.into(),
            bounty,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BountyListResponse {
    pub success: bool,
    #[schema(example = "Bounties retrieved")]
    pub message: String,
    pub bounties: Vec<Bounty>,
}

impl BountyListResponse {
    pub fn new(message: impl Into<String>, bounties: Vec<Bounty>) -> Self {
        Self {
            success: true,
            message: message.into(),
            bounties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_amount_accepts_currency_strings_and_numbers() {
        assert_eq!(parse_amount("$200000").unwrap(), Decimal::from(200_000));
        assert_eq!(
            parse_amount("1,250.50").unwrap(),
            Decimal::from_str("1250.50").unwrap()
        );
        assert!(parse_amount("lots").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount(&"9".repeat(AMOUNT_MAX_LEN + 1)).is_err());

        let request: CreateBountyRequest = serde_json::from_value(json!({
            "personName": "Vicious",
            "amount": 42.5,
            "spottedDate": "2030-01-02"
        }))
        .unwrap();
        assert_eq!(request.amount, Decimal::from_str("42.5").unwrap());
    }

    #[test]
    fn test_spotted_date_formats() {
        let expected = Utc.with_ymd_and_hms(2077, 12, 20, 0, 0, 0).unwrap();
        assert_eq!(parse_spotted_date("2077-12-20T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_spotted_date("2077-12-20T00:00:00").unwrap(), expected);
        assert_eq!(parse_spotted_date("2077-12-20").unwrap(), expected);
        assert_eq!(
            parse_spotted_date("2077-12-20T02:00:00+02:00").unwrap(),
            expected
        );
        assert!(parse_spotted_date("December 20th").is_err());
    }

    #[test]
    fn test_defaults_and_missing_date() {
        let request: CreateBountyRequest = serde_json::from_value(json!({
            "personName": "Vicious",
            "amount": "$10"
        }))
        .unwrap();

        assert!(request.is_active);
        assert!(request.threat_level.is_none());
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(request.into_new_bounty().is_none());
    }

    #[test]
    fn test_threat_level_is_case_insensitive_in_body() {
        let request: CreateBountyRequest = serde_json::from_value(json!({
            "personName": "Vicious",
            "amount": 1,
            "spottedDate": "2030-01-02T10:00:00Z",
            "threatLevel": "critical",
            "isActive": false
        }))
        .unwrap();

        assert_eq!(request.threat_level, Some(ThreatLevel::Critical));
        assert!(!request.is_active);
    }
}
