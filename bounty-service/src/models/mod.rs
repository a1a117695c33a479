//! Domain models for bounty-service.

mod bounty;
mod hunter;

pub use bounty::{
    demo_bounties, Bounty, BountyRow, NewBounty, ThreatLevel, AMOUNT_MAX_LEN, AMOUNT_SCALE,
    PERSON_NAME_MAX_LEN,
};
pub use hunter::{Hunter, HunterResponse, NewHunter, HUNTER_EMAIL_MAX_LEN};
