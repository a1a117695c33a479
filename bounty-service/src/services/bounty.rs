//! Bounty catalogue operations.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::models::{Bounty, NewBounty, ThreatLevel, AMOUNT_SCALE, PERSON_NAME_MAX_LEN};
use crate::services::error::ServiceError;
use crate::services::metrics::BOUNTIES_CREATED;
use crate::services::store::{BountyFilter, BountyStore};

#[derive(Clone)]
pub struct BountyService {
    store: Arc<dyn BountyStore>,
}

impl BountyService {
    pub fn new(store: Arc<dyn BountyStore>) -> Self {
        Self { store }
    }

    /// Active bounties, newest spotted date first.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Bounty>, ServiceError> {
        Ok(self.store.find_where(&BountyFilter::active()).await?)
    }

    /// Any bounty by id, active or not.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<Bounty, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Active bounties at exactly `level`, in `list_active` order.
    #[instrument(skip(self))]
    pub async fn list_by_threat_level(
        &self,
        level: ThreatLevel,
    ) -> Result<Vec<Bounty>, ServiceError> {
        let filter = BountyFilter::active().with_threat_level(level);
        Ok(self.store.find_where(&filter).await?)
    }

    #[instrument(skip(self, input), fields(person_name = %input.person_name))]
    pub async fn create(&self, input: NewBounty) -> Result<Bounty, ServiceError> {
        let input = normalize(input)?;
        let bounty = self.store.insert(&input).await?;

        BOUNTIES_CREATED.inc();
        info!(
            bounty_id = bounty.id,
            threat_level = ?bounty.threat_level,
            "Bounty created"
        );

        Ok(bounty)
    }
}

/// Trim text fields, fix the amount scale and enforce field limits.
fn normalize(mut input: NewBounty) -> Result<NewBounty, ServiceError> {
    input.person_name = input.person_name.trim().to_string();
    if input.person_name.is_empty() {
        return Err(ServiceError::ValidationFailed(
            "Person name is required".to_string(),
        ));
    }
    if input.person_name.chars().count() > PERSON_NAME_MAX_LEN {
        return Err(ServiceError::ValidationFailed(format!(
            "Person name must be at most {} characters",
            PERSON_NAME_MAX_LEN
        )));
    }

    input.amount = normalize_amount(input.amount)?;

    input.description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(input)
}

fn normalize_amount(amount: Decimal) -> Result<Decimal, ServiceError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ServiceError::ValidationFailed(
            "Amount must not be negative".to_string(),
        ));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ServiceError::ValidationFailed(format!(
            "Amount must have at most {} decimal places",
            AMOUNT_SCALE
        )));
    }

    // rescale silently keeps a smaller scale when the mantissa cannot hold the digits
    let mut amount = amount.abs();
    amount.rescale(AMOUNT_SCALE);
    if amount.scale() != AMOUNT_SCALE {
        return Err(ServiceError::ValidationFailed(
            "Amount is too large".to_string(),
        ));
    }
    Ok(amount)
}
