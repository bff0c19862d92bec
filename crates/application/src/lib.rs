//! Authorization engine services and ports.

#![forbid(unsafe_code)]

mod account_status_service;
mod authorizer;
mod club_membership_service;
mod coach_link_service;
mod decision_cache;
mod events;
mod oracle;

pub use account_status_service::{AccountStatusRepository, AccountStatusService};
pub use authorizer::{DEFAULT_DECISION_TTL, ResourceAuthorizer};
pub use club_membership_service::{ClubMembershipService, ClubRepository};
pub use coach_link_service::{CoachLinkRepository, CoachLinkService};
pub use decision_cache::{DecisionCache, DecisionKey};
pub use events::RelationshipEventPublisher;
pub use oracle::RelationshipOracle;
