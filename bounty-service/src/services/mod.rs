pub mod auth;
pub mod bounty;
pub mod database;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod store;

pub use auth::AuthService;
pub use bounty::BountyService;
pub use database::Database;
pub use error::ServiceError;
pub use memory::InMemoryStore;
pub use store::{
    BountyFilter, BountyStore, HunterFilter, HunterStore, StoreError, StoreHealth,
};
