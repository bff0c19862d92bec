use std::fmt::{Display, Formatter};

use ringmate_core::{BoxerId, ClubId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

/// The authenticated actor behind one evaluation.
///
/// Constructed per request from verified credentials; never persisted by
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    user_id: UserId,
    role: Role,
}

impl Subject {
    /// Creates a subject from an authenticated user and their role.
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns the subject's user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the subject's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Kinds of resources a scoped permission can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A boxer profile.
    Boxer,
    /// A club.
    Club,
    /// An availability window.
    Availability,
    /// A match request.
    MatchRequest,
}

impl ResourceKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boxer => "boxer",
            Self::Club => "club",
            Self::Availability => "availability",
            Self::MatchRequest => "match_request",
        }
    }
}

/// Reference to the concrete resource an evaluation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    kind: ResourceKind,
    id: Uuid,
}

impl ResourceRef {
    /// Creates a resource reference.
    #[must_use]
    pub fn new(kind: ResourceKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Creates a reference to a boxer profile.
    #[must_use]
    pub fn boxer(id: BoxerId) -> Self {
        Self::new(ResourceKind::Boxer, id.as_uuid())
    }

    /// Creates a reference to a club.
    #[must_use]
    pub fn club(id: ClubId) -> Self {
        Self::new(ResourceKind::Club, id.as_uuid())
    }

    /// Returns the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the resource identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Display for ResourceRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}/{}", self.kind.as_str(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use ringmate_core::BoxerId;

    use super::{ResourceKind, ResourceRef};

    #[test]
    fn resource_ref_formats_kind_and_id() {
        let boxer_id = BoxerId::new();
        let resource = ResourceRef::boxer(boxer_id);
        assert_eq!(resource.kind(), ResourceKind::Boxer);
        assert_eq!(resource.to_string(), format!("boxer/{boxer_id}"));
    }
}
