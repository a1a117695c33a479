//! Hunter registration and login.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::models::{HunterResponse, NewHunter, HUNTER_EMAIL_MAX_LEN};
use crate::services::error::ServiceError;
use crate::services::metrics::{HUNTERS_REGISTERED, LOGIN_ATTEMPTS};
use crate::services::store::{HunterFilter, HunterStore, StoreError};
use crate::utils::password::{digest_password, verify_password, Password, PasswordDigest};

/// Emails are stored and compared in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn HunterStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn HunterStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, name, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &Password,
    ) -> Result<HunterResponse, ServiceError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.as_str().is_empty() {
            return Err(ServiceError::ValidationFailed(
                "Name, email and password are required".to_string(),
            ));
        }
        if email.chars().count() > HUNTER_EMAIL_MAX_LEN {
            return Err(ServiceError::ValidationFailed(format!(
                "Email must be at most {} characters",
                HUNTER_EMAIL_MAX_LEN
            )));
        }

        let existing = self
            .store
            .find_where(&HunterFilter::by_email(email.as_str()))
            .await?;
        if !existing.is_empty() {
            warn!("Registration rejected: email already registered");
            return Err(ServiceError::DuplicateEmail);
        }

        let new_hunter = NewHunter {
            name: name.to_string(),
            email,
            password_hash: digest_password(password).into_string(),
            created_at: Utc::now(),
        };

        let hunter = self.store.insert(&new_hunter).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => ServiceError::DuplicateEmail,
            other => ServiceError::Storage(other),
        })?;

        HUNTERS_REGISTERED.inc();
        info!(hunter_id = hunter.id, "Hunter registered");

        Ok(hunter.sanitized())
    }

    /// Every failure (unknown email, wrong password) yields the same error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &Password,
    ) -> Result<HunterResponse, ServiceError> {
        let email = normalize_email(email);
        let candidates = self.store.find_where(&HunterFilter::by_email(email)).await?;

        let matched = candidates.into_iter().find(|hunter| {
            verify_password(password, &PasswordDigest::new(hunter.password_hash.clone()))
        });

        match matched {
            Some(hunter) => {
                LOGIN_ATTEMPTS.with_label_values(&["success"]).inc();
                info!(hunter_id = hunter.id, "Hunter logged in");
                Ok(hunter.sanitized())
            }
            None => {
                LOGIN_ATTEMPTS.with_label_values(&["failure"]).inc();
                warn!("Login failed");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}
