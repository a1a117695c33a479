//! PostgreSQL gateway for bounty-service.

use crate::config::DatabaseConfig;
use crate::models::{Bounty, BountyRow, Hunter, NewBounty, NewHunter};
use crate::services::metrics::{DB_QUERY_DURATION, ERRORS_TOTAL};
use crate::services::store::{
    BountyFilter, BountyStore, HunterFilter, HunterStore, StoreError, StoreHealth,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{error, info, instrument};

const BOUNTY_COLUMNS: &str =
    "id, person_name, amount, spotted_date, description, threat_level, is_active";

const HUNTER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Owns the pool shared by the hunter and bounty gateways.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip(config), fields(service = "bounty-service"))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(config.url.expose_secret())
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Apply `migrations/`, which also seeds the demo bounties on a fresh database.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }
}

fn storage_error(operation: &str, e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::UniqueViolation(db_err.constraint().unwrap_or("unique").to_string())
        }
        _ => {
            ERRORS_TOTAL.with_label_values(&["storage"]).inc();
            StoreError::Unavailable(anyhow::anyhow!("Failed to {}: {}", operation, e))
        }
    }
}

fn into_bounty(row: BountyRow) -> Result<Bounty, StoreError> {
    Bounty::try_from(row).map_err(|e| {
        ERRORS_TOTAL.with_label_values(&["corrupt_row"]).inc();
        error!(error = %e, "Stored bounty could not be decoded");
        StoreError::CorruptRow(e)
    })
}

#[async_trait]
impl BountyStore for Database {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Bounty>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_all_bounties"])
            .start_timer();

        let rows = sqlx::query_as::<_, BountyRow>(&format!(
            "SELECT {} FROM bounties ORDER BY id",
            BOUNTY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list bounties", e))?;

        timer.observe_duration();

        rows.into_iter().map(into_bounty).collect()
    }

    #[instrument(skip(self), fields(bounty_id = id))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Bounty>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_bounty"])
            .start_timer();

        let row = sqlx::query_as::<_, BountyRow>(&format!(
            "SELECT {} FROM bounties WHERE id = $1",
            BOUNTY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("get bounty", e))?;

        timer.observe_duration();

        row.map(into_bounty).transpose()
    }

    #[instrument(skip(self))]
    async fn find_where(&self, filter: &BountyFilter) -> Result<Vec<Bounty>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_bounties_where"])
            .start_timer();

        let rows = sqlx::query_as::<_, BountyRow>(&format!(
            r#"
            SELECT {}
            FROM bounties
            WHERE ($1::boolean IS NULL OR is_active = $1)
              AND ($2::varchar IS NULL OR threat_level = $2)
            ORDER BY spotted_date DESC, id ASC
            "#,
            BOUNTY_COLUMNS
        ))
        .bind(filter.active)
        .bind(filter.threat_level.map(|level| level.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("filter bounties", e))?;

        timer.observe_duration();

        rows.into_iter().map(into_bounty).collect()
    }

    #[instrument(skip(self, bounty), fields(person_name = %bounty.person_name))]
    async fn insert(&self, bounty: &NewBounty) -> Result<Bounty, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_bounty"])
            .start_timer();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        let row = sqlx::query_as::<_, BountyRow>(&format!(
            r#"
            INSERT INTO bounties (person_name, amount, spotted_date, description, threat_level, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOUNTY_COLUMNS
        ))
        .bind(&bounty.person_name)
        .bind(bounty.amount)
        .bind(bounty.spotted_date)
        .bind(&bounty.description)
        .bind(bounty.threat_level.map(|level| level.as_str()))
        .bind(bounty.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("insert bounty", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("commit bounty", e))?;

        timer.observe_duration();

        let created = into_bounty(row)?;
        info!(bounty_id = created.id, "Bounty row inserted");
        Ok(created)
    }
}

#[async_trait]
impl HunterStore for Database {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Hunter>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_all_hunters"])
            .start_timer();

        let hunters = sqlx::query_as::<_, Hunter>(&format!(
            "SELECT {} FROM hunters ORDER BY id",
            HUNTER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list hunters", e))?;

        timer.observe_duration();

        Ok(hunters)
    }

    #[instrument(skip(self), fields(hunter_id = id))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Hunter>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_hunter"])
            .start_timer();

        let hunter = sqlx::query_as::<_, Hunter>(&format!(
            "SELECT {} FROM hunters WHERE id = $1",
            HUNTER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("get hunter", e))?;

        timer.observe_duration();

        Ok(hunter)
    }

    #[instrument(skip(self, filter))]
    async fn find_where(&self, filter: &HunterFilter) -> Result<Vec<Hunter>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_hunters_where"])
            .start_timer();

        let hunters = sqlx::query_as::<_, Hunter>(&format!(
            r#"
            SELECT {}
            FROM hunters
            WHERE ($1::varchar IS NULL OR email = $1)
            ORDER BY id
            "#,
            HUNTER_COLUMNS
        ))
        .bind(filter.email.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("filter hunters", e))?;

        timer.observe_duration();

        Ok(hunters)
    }

    #[instrument(skip(self, hunter))]
    async fn insert(&self, hunter: &NewHunter) -> Result<Hunter, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_hunter"])
            .start_timer();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        let created = sqlx::query_as::<_, Hunter>(&format!(
            r#"
            INSERT INTO hunters (name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            HUNTER_COLUMNS
        ))
        .bind(&hunter.name)
        .bind(&hunter.email)
        .bind(&hunter.password_hash)
        .bind(hunter.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("insert hunter", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("commit hunter", e))?;

        timer.observe_duration();

        info!(hunter_id = created.id, "Hunter row inserted");
        Ok(created)
    }
}

#[async_trait]
impl StoreHealth for Database {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("run health check", e))?;
        Ok(())
    }
}
