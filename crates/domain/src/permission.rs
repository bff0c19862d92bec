use std::str::FromStr;

use ringmate_core::AppError;
use serde::{Deserialize, Serialize};

/// Fine-grained permissions enforced by policy checks.
///
/// The storage string follows a `resource:action:scope` convention. The
/// string is documentation and a stable storage value; it is never parsed
/// to drive a decision — scope resolution goes through
/// [`Permission::required_scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows viewing any public boxer profile.
    BoxerViewAny,
    /// Allows viewing a linked boxer's full profile.
    BoxerViewLinked,
    /// Allows updating the subject's own boxer profile.
    BoxerUpdateOwn,
    /// Allows updating a linked boxer's profile.
    BoxerUpdateLinked,
    /// Allows managing the subject's own availability windows.
    AvailabilityManageOwn,
    /// Allows managing a linked boxer's availability windows.
    AvailabilityManageLinked,
    /// Allows viewing any fight record.
    FightViewAny,
    /// Allows managing the subject's own fight history.
    FightManageOwn,
    /// Allows managing a linked boxer's fight history.
    FightManageLinked,
    /// Allows managing fight history for boxers in an owned club.
    FightManageMembers,
    /// Allows creating match requests for the subject's own boxer.
    MatchRequestCreateOwn,
    /// Allows responding to match requests for a linked boxer.
    MatchRequestRespondLinked,
    /// Allows updating an owned club.
    ClubUpdateOwner,
    /// Allows adding and removing members of an owned club.
    ClubManageMembersOwner,
    /// Allows transferring ownership of an owned club.
    ClubTransferOwner,
    /// Allows viewing platform-wide statistics.
    AdminStatsView,
    /// Allows toggling account activation.
    AccountStatusManage,
}

/// Resource scope a permission must be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    /// No resource context; the role grant alone decides.
    Unscoped,
    /// The subject must own the referenced resource.
    Own,
    /// The subject must hold a coach link to the referenced boxer.
    Linked,
    /// The subject must own the club implied by the referenced resource.
    ClubOwner,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoxerViewAny => "boxer:view:any",
            Self::BoxerViewLinked => "boxer:view:linked",
            Self::BoxerUpdateOwn => "boxer:update:own",
            Self::BoxerUpdateLinked => "boxer:update:linked",
            Self::AvailabilityManageOwn => "availability:manage:own",
            Self::AvailabilityManageLinked => "availability:manage:linked",
            Self::FightViewAny => "fight:view:any",
            Self::FightManageOwn => "fight:manage:own",
            Self::FightManageLinked => "fight:manage:linked",
            Self::FightManageMembers => "fight:manage:members",
            Self::MatchRequestCreateOwn => "match_request:create:own",
            Self::MatchRequestRespondLinked => "match_request:respond:linked",
            Self::ClubUpdateOwner => "club:update:owner",
            Self::ClubManageMembersOwner => "club:members:owner",
            Self::ClubTransferOwner => "club:transfer:owner",
            Self::AdminStatsView => "admin:stats:any",
            Self::AccountStatusManage => "account:status:any",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::BoxerViewAny,
            Permission::BoxerViewLinked,
            Permission::BoxerUpdateOwn,
            Permission::BoxerUpdateLinked,
            Permission::AvailabilityManageOwn,
            Permission::AvailabilityManageLinked,
            Permission::FightViewAny,
            Permission::FightManageOwn,
            Permission::FightManageLinked,
            Permission::FightManageMembers,
            Permission::MatchRequestCreateOwn,
            Permission::MatchRequestRespondLinked,
            Permission::ClubUpdateOwner,
            Permission::ClubManageMembersOwner,
            Permission::ClubTransferOwner,
            Permission::AdminStatsView,
            Permission::AccountStatusManage,
        ];

        ALL
    }

    /// Returns whether a storage value names a catalog permission.
    #[must_use]
    pub fn exists(value: &str) -> bool {
        Self::from_str(value).is_ok()
    }

    /// Returns the resource scope this permission is resolved against.
    #[must_use]
    pub fn required_scope(&self) -> ResourceScope {
        match self {
            Self::BoxerViewAny
            | Self::FightViewAny
            | Self::AdminStatsView
            | Self::AccountStatusManage => ResourceScope::Unscoped,
            Self::BoxerUpdateOwn
            | Self::AvailabilityManageOwn
            | Self::FightManageOwn
            | Self::MatchRequestCreateOwn => ResourceScope::Own,
            Self::BoxerViewLinked
            | Self::BoxerUpdateLinked
            | Self::AvailabilityManageLinked
            | Self::FightManageLinked
            | Self::MatchRequestRespondLinked => ResourceScope::Linked,
            Self::ClubUpdateOwner
            | Self::ClubManageMembersOwner
            | Self::ClubTransferOwner
            | Self::FightManageMembers => ResourceScope::ClubOwner,
        }
    }

    /// Returns whether this permission belongs to the fight-management
    /// family subject to the boxer self-management override.
    ///
    /// `fight:view:any` is a read permission and is not part of the family.
    #[must_use]
    pub fn is_fight_management(&self) -> bool {
        matches!(
            self,
            Self::FightManageOwn | Self::FightManageLinked | Self::FightManageMembers
        )
    }

    /// Returns the coach link level that grants this linked-scope
    /// permission exactly, or `None` for non-linked permissions.
    ///
    /// [`CoachPermission::FullAccess`] grants every linked permission;
    /// intermediate levels grant only their mapped permission and do not
    /// imply one another.
    #[must_use]
    pub fn required_coach_level(&self) -> Option<CoachPermission> {
        match self {
            Self::BoxerViewLinked => Some(CoachPermission::ViewProfile),
            Self::BoxerUpdateLinked => Some(CoachPermission::EditProfile),
            Self::AvailabilityManageLinked => Some(CoachPermission::ManageAvailability),
            Self::FightManageLinked => Some(CoachPermission::ManageFights),
            Self::MatchRequestRespondLinked => Some(CoachPermission::RespondMatchRequests),
            _ => None,
        }
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "boxer:view:any" => Ok(Self::BoxerViewAny),
            "boxer:view:linked" => Ok(Self::BoxerViewLinked),
            "boxer:update:own" => Ok(Self::BoxerUpdateOwn),
            "boxer:update:linked" => Ok(Self::BoxerUpdateLinked),
            "availability:manage:own" => Ok(Self::AvailabilityManageOwn),
            "availability:manage:linked" => Ok(Self::AvailabilityManageLinked),
            "fight:view:any" => Ok(Self::FightViewAny),
            "fight:manage:own" => Ok(Self::FightManageOwn),
            "fight:manage:linked" => Ok(Self::FightManageLinked),
            "fight:manage:members" => Ok(Self::FightManageMembers),
            "match_request:create:own" => Ok(Self::MatchRequestCreateOwn),
            "match_request:respond:linked" => Ok(Self::MatchRequestRespondLinked),
            "club:update:owner" => Ok(Self::ClubUpdateOwner),
            "club:members:owner" => Ok(Self::ClubManageMembersOwner),
            "club:transfer:owner" => Ok(Self::ClubTransferOwner),
            "admin:stats:any" => Ok(Self::AdminStatsView),
            "account:status:any" => Ok(Self::AccountStatusManage),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

/// Access level a coach holds over one linked boxer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachPermission {
    /// View the linked boxer's full profile.
    ViewProfile,
    /// Edit the linked boxer's profile.
    EditProfile,
    /// Manage the linked boxer's availability windows.
    ManageAvailability,
    /// Manage the linked boxer's fight history.
    ManageFights,
    /// Respond to match requests on the linked boxer's behalf.
    RespondMatchRequests,
    /// All of the above.
    FullAccess,
}

impl CoachPermission {
    /// Returns a stable storage value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewProfile => "view_profile",
            Self::EditProfile => "edit_profile",
            Self::ManageAvailability => "manage_availability",
            Self::ManageFights => "manage_fights",
            Self::RespondMatchRequests => "respond_match_requests",
            Self::FullAccess => "full_access",
        }
    }

    /// Returns whether this level grants a linked-scope permission.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        match permission.required_coach_level() {
            Some(required) => *self == Self::FullAccess || *self == required,
            None => false,
        }
    }
}

impl FromStr for CoachPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view_profile" => Ok(Self::ViewProfile),
            "edit_profile" => Ok(Self::EditProfile),
            "manage_availability" => Ok(Self::ManageAvailability),
            "manage_fights" => Ok(Self::ManageFights),
            "respond_match_requests" => Ok(Self::RespondMatchRequests),
            "full_access" => Ok(Self::FullAccess),
            _ => Err(AppError::Validation(format!(
                "unknown coach permission value '{value}'"
            ))),
        }
    }
}
