use std::str::FromStr;

use ringmate_core::AppError;
use serde::{Deserialize, Serialize};

use crate::Permission;

/// Platform roles. A subject holds exactly one role at evaluation time.
///
/// The role matrix is flat: each role's grant set is an explicit
/// enumeration, there is no inheritance between roles, and the tables are
/// fixed at compile time with no runtime mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A boxer managing their own profile.
    Boxer,
    /// A coach managing linked boxers.
    Coach,
    /// A club owner managing club membership.
    ClubManager,
    /// Platform administrator; granted the full catalog.
    Admin,
}

const BOXER_GRANTS: &[Permission] = &[
    Permission::BoxerViewAny,
    Permission::BoxerUpdateOwn,
    Permission::AvailabilityManageOwn,
    Permission::FightViewAny,
    // Legacy own-scope grant; the authorizer's fight-history override
    // denies it for the Boxer role at resolution time.
    Permission::FightManageOwn,
    Permission::MatchRequestCreateOwn,
];

const COACH_GRANTS: &[Permission] = &[
    Permission::BoxerViewAny,
    Permission::BoxerViewLinked,
    Permission::BoxerUpdateLinked,
    Permission::AvailabilityManageLinked,
    Permission::FightViewAny,
    Permission::FightManageLinked,
    Permission::MatchRequestRespondLinked,
];

const CLUB_MANAGER_GRANTS: &[Permission] = &[
    Permission::BoxerViewAny,
    Permission::FightViewAny,
    Permission::FightManageMembers,
    Permission::ClubUpdateOwner,
    Permission::ClubManageMembersOwner,
    Permission::ClubTransferOwner,
];

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boxer => "boxer",
            Self::Coach => "coach",
            Self::ClubManager => "club_manager",
            Self::Admin => "admin",
        }
    }

    /// Returns the static grant set for this role.
    #[must_use]
    pub fn granted_to(&self) -> &'static [Permission] {
        match self {
            Self::Boxer => BOXER_GRANTS,
            Self::Coach => COACH_GRANTS,
            Self::ClubManager => CLUB_MANAGER_GRANTS,
            Self::Admin => Permission::all(),
        }
    }

    /// Returns whether this role's static grant set contains the permission.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.granted_to().contains(&permission)
    }

    /// Returns whether this role holds at least one of the permissions.
    #[must_use]
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .any(|permission| self.has_permission(*permission))
    }

    /// Returns whether this role holds every one of the permissions.
    #[must_use]
    pub fn has_all(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .all(|permission| self.has_permission(*permission))
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "boxer" => Ok(Self::Boxer),
            "coach" => Ok(Self::Coach),
            "club_manager" => Ok(Self::ClubManager),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}
