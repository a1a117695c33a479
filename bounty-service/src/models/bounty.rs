//! Bounty model - wanted-person listings.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Longest accepted person name, in characters.
pub const PERSON_NAME_MAX_LEN: usize = 100;

/// Longest accepted amount, in characters of its decimal rendering.
pub const AMOUNT_MAX_LEN: usize = 50;

/// Fractional digits kept for every stored amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Informational danger rating. Only used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 4] = [
        ThreatLevel::Low,
        ThreatLevel::Medium,
        ThreatLevel::High,
        ThreatLevel::Critical,
    ];

    /// Get string representation for database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThreatLevel {
    type Err = String;

    /// Level names match regardless of case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Unknown threat level '{}', expected one of Low, Medium, High, Critical",
                    s
                )
            })
    }
}

impl<'de> Deserialize<'de> for ThreatLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A wanted-person listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Sai")]
    pub person_name: String,
    #[schema(value_type = String, example = "200000.00")]
    pub amount: Decimal,
    pub spotted_date: DateTime<Utc>,
    #[schema(example = "Notorious cyber criminal wanted for data breaches")]
    pub description: Option<String>,
    pub threat_level: Option<ThreatLevel>,
    pub is_active: bool,
}

/// Raw `bounties` row; the threat level column is free text in the database.
#[derive(Debug, FromRow)]
pub struct BountyRow {
    pub id: i32,
    pub person_name: String,
    pub amount: Decimal,
    pub spotted_date: DateTime<Utc>,
    pub description: Option<String>,
    pub threat_level: Option<String>,
    pub is_active: bool,
}

impl TryFrom<BountyRow> for Bounty {
    type Error = String;

    fn try_from(row: BountyRow) -> Result<Self, Self::Error> {
        let threat_level = row
            .threat_level
            .as_deref()
            .map(str::parse::<ThreatLevel>)
            .transpose()
            .map_err(|e| format!("bounty {}: {}", row.id, e))?;

        Ok(Self {
            id: row.id,
            person_name: row.person_name,
            amount: row.amount,
            spotted_date: row.spotted_date,
            description: row.description,
            threat_level,
            is_active: row.is_active,
        })
    }
}

/// Input for creating a new bounty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBounty {
    pub person_name: String,
    pub amount: Decimal,
    pub spotted_date: DateTime<Utc>,
    pub description: Option<String>,
    pub threat_level: Option<ThreatLevel>,
    pub is_active: bool,
}

impl NewBounty {
    /// Attach a store-assigned id.
    pub fn into_bounty(self, id: i32) -> Bounty {
        Bounty {
            id,
            person_name: self.person_name,
            amount: self.amount,
            spotted_date: self.spotted_date,
            description: self.description,
            threat_level: self.threat_level,
            is_active: self.is_active,
        }
    }
}

fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The five listings every fresh database starts with.
///
/// Mirrors `migrations/*_seed_bounties.sql`; the in-memory store seeds from here.
pub fn demo_bounties() -> Vec<Bounty> {
    let seed = |id, name: &str, amount: i64, date, level, description: &str| Bounty {
        id,
        person_name: name.to_string(),
        amount: Decimal::new(amount * 100, AMOUNT_SCALE),
        spotted_date: date,
        description: Some(description.to_string()),
        threat_level: Some(level),
        is_active: true,
    };

    vec![
        seed(
            1,
            "Sai",
            200_000,
            utc_midnight(2077, 12, 20),
            ThreatLevel::Critical,
            "Notorious cyber criminal wanted for data breaches",
        ),
        seed(
            2,
            "Jayak",
            2,
            utc_midnight(2025, 12, 13),
            ThreatLevel::Low,
            "Minor offense - parking violation in the dark web",
        ),
        seed(
            3,
            "Raven",
            50_000,
            utc_midnight(2026, 6, 18),
            ThreatLevel::High,
            "Known hacker specializing in ransomware",
        ),
        seed(
            4,
            "Nyx",
            900_000,
            utc_midnight(2027, 1, 1),
            ThreatLevel::Critical,
            "Mastermind behind multiple zero-day exploits",
        ),
        seed(
            5,
            "ShadowX",
            12_000,
            utc_midnight(2025, 9, 9),
            ThreatLevel::Medium,
            "Identity thief operating in the shadows",
        ),
    ]
}
