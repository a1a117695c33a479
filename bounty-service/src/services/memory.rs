//! In-process gateway used by tests and the router suite.
//!
//! Each table sits behind its own mutex, so inserts are atomic and email
//! uniqueness is checked under the same lock that assigns the id.

use crate::models::{demo_bounties, Bounty, Hunter, NewBounty, NewHunter};
use crate::services::store::{
    BountyFilter, BountyStore, HunterFilter, HunterStore, StoreError, StoreHealth,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    hunters: Mutex<Table<Hunter>>,
    bounties: Mutex<Table<Bounty>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the five demo bounties; new ids continue after them.
    pub fn seeded() -> Self {
        let store = Self::new();
        if let Ok(mut table) = store.bounties.lock() {
            for bounty in demo_bounties() {
                table.next_id = table.next_id.max(bounty.id + 1);
                table.rows.insert(bounty.id, bounty);
            }
        }
        store
    }

    /// Make every subsequent call fail as if the backend were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn lock<'a, T>(&self, table: &'a Mutex<Table<T>>) -> Result<MutexGuard<'a, Table<T>>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow::anyhow!(
                "in-memory store is offline"
            )));
        }
        table
            .lock()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("in-memory store lock poisoned")))
    }
}

fn newest_first(a: &Bounty, b: &Bounty) -> std::cmp::Ordering {
    b.spotted_date
        .cmp(&a.spotted_date)
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl BountyStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Bounty>, StoreError> {
        let table = self.lock(&self.bounties)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Bounty>, StoreError> {
        let table = self.lock(&self.bounties)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_where(&self, filter: &BountyFilter) -> Result<Vec<Bounty>, StoreError> {
        let table = self.lock(&self.bounties)?;
        let mut matches: Vec<Bounty> = table
            .rows
            .values()
            .filter(|bounty| filter.matches(bounty))
            .cloned()
            .collect();
        matches.sort_by(newest_first);
        Ok(matches)
    }

    async fn insert(&self, bounty: &NewBounty) -> Result<Bounty, StoreError> {
        let mut table = self.lock(&self.bounties)?;
        let id = table.allocate_id();
        let created = bounty.clone().into_bounty(id);
        table.rows.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl HunterStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Hunter>, StoreError> {
        let table = self.lock(&self.hunters)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Hunter>, StoreError> {
        let table = self.lock(&self.hunters)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_where(&self, filter: &HunterFilter) -> Result<Vec<Hunter>, StoreError> {
        let table = self.lock(&self.hunters)?;
        Ok(table
            .rows
            .values()
            .filter(|hunter| filter.matches(hunter))
            .cloned()
            .collect())
    }

    async fn insert(&self, hunter: &NewHunter) -> Result<Hunter, StoreError> {
        let mut table = self.lock(&self.hunters)?;
        if table.rows.values().any(|h| h.email == hunter.email) {
            return Err(StoreError::UniqueViolation(
                "hunters_email_unique".to_string(),
            ));
        }
        let id = table.allocate_id();
        let created = hunter.clone().into_hunter(id);
        table.rows.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock(&self.bounties).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThreatLevel;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn new_hunter(email: &str) -> NewHunter {
        NewHunter {
            name: "Jet".to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn seeded_store_continues_ids_after_demo_rows() {
        let store = InMemoryStore::seeded();
        let created = BountyStore::insert(
            &store,
            &NewBounty {
                person_name: "Vicious".to_string(),
                amount: Decimal::new(100, 2),
                spotted_date: Utc::now(),
                description: None,
                threat_level: Some(ThreatLevel::High),
                is_active: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(created.id, 6);
        assert_eq!(BountyStore::find_all(&store).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn active_bounties_are_newest_first() {
        let store = InMemoryStore::seeded();
        let names: Vec<String> = BountyStore::find_where(&store, &BountyFilter::active())
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.person_name)
            .collect();

        assert_eq!(names, vec!["Sai", "Nyx", "Raven", "Jayak", "ShadowX"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = InMemoryStore::new();
        HunterStore::insert(&store, &new_hunter("jet@bebop.example"))
            .await
            .unwrap();

        let err = HunterStore::insert(&store, &new_hunter("jet@bebop.example"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(HunterStore::find_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = InMemoryStore::seeded();
        store.set_offline(true);

        assert!(matches!(
            store.health_check().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(BountyStore::find_by_id(&store, 1).await.is_err());

        store.set_offline(false);
        assert!(store.health_check().await.is_ok());
    }
}
