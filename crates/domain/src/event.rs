use ringmate_core::{BoxerId, ClubId, UserId};
use serde::{Deserialize, Serialize};

/// Relationship mutation published by the services that change ownership
/// or linkage facts.
///
/// Every mutating operation publishes its event before reporting success,
/// so cached verdicts derived from the old fact are dropped within the
/// same causal chain. Publication is part of the mutation contract:
/// a missing event is a bug the service tests assert against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipEvent {
    /// A coach link was created, re-levelled or removed.
    CoachLinkChanged {
        /// Coach side of the link.
        coach_user_id: UserId,
        /// Linked boxer.
        boxer_id: BoxerId,
    },
    /// Club ownership moved to a different user.
    ClubOwnershipTransferred {
        /// The club changing hands.
        club_id: ClubId,
        /// Owner before the transfer.
        previous_owner: UserId,
        /// Owner after the transfer.
        new_owner: UserId,
    },
    /// A boxer joined or left a club.
    ClubMemberChanged {
        /// The club whose roster changed.
        club_id: ClubId,
        /// The boxer joining or leaving.
        boxer_id: BoxerId,
    },
    /// A boxer moved to a different club.
    BoxerReassigned {
        /// The reassigned boxer.
        boxer_id: BoxerId,
        /// The club the boxer now belongs to.
        club_id: ClubId,
    },
    /// An account was activated or deactivated.
    AccountStatusChanged {
        /// The affected user.
        user_id: UserId,
    },
}
