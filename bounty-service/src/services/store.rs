//! Persistence gateway traits.
//!
//! Each aggregate gets its own trait so services only see the table they own.
//! `Database` (PostgreSQL) and `InMemoryStore` implement all of them.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Bounty, Hunter, NewBounty, NewHunter, ThreatLevel};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write; carries the constraint name.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored row could not be mapped back into a model.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Store unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

/// Typed predicate for bounty queries. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BountyFilter {
    pub active: Option<bool>,
    pub threat_level: Option<ThreatLevel>,
}

impl BountyFilter {
    pub fn active() -> Self {
        Self {
            active: Some(true),
            threat_level: None,
        }
    }

    pub fn with_threat_level(mut self, level: ThreatLevel) -> Self {
        self.threat_level = Some(level);
        self
    }

    pub fn matches(&self, bounty: &Bounty) -> bool {
        self.active.map_or(true, |active| bounty.is_active == active)
            && self
                .threat_level
                .map_or(true, |level| bounty.threat_level == Some(level))
    }
}

/// Typed predicate for hunter queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HunterFilter {
    pub email: Option<String>,
}

impl HunterFilter {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    pub fn matches(&self, hunter: &Hunter) -> bool {
        self.email
            .as_deref()
            .map_or(true, |email| hunter.email == email)
    }
}

#[async_trait]
pub trait BountyStore: Send + Sync {
    /// Every bounty, ordered by id.
    async fn find_all(&self) -> Result<Vec<Bounty>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Bounty>, StoreError>;

    /// Matching bounties, newest spotted date first, ties by ascending id.
    async fn find_where(&self, filter: &BountyFilter) -> Result<Vec<Bounty>, StoreError>;

    /// Insert atomically and return the stored row with its new id.
    async fn insert(&self, bounty: &NewBounty) -> Result<Bounty, StoreError>;
}

#[async_trait]
pub trait HunterStore: Send + Sync {
    /// Every hunter, ordered by id.
    async fn find_all(&self) -> Result<Vec<Hunter>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Hunter>, StoreError>;

    /// Matching hunters, ordered by id.
    async fn find_where(&self, filter: &HunterFilter) -> Result<Vec<Hunter>, StoreError>;

    /// Insert atomically. A taken email yields `StoreError::UniqueViolation`.
    async fn insert(&self, hunter: &NewHunter) -> Result<Hunter, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;
}
