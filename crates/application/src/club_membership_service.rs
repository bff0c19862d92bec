use std::sync::Arc;

use async_trait::async_trait;
use ringmate_core::{AppError, AppResult, BoxerId, ClubId, UserId};
use ringmate_domain::{Permission, RelationshipEvent, ResourceRef, Subject};

use crate::{RelationshipEventPublisher, ResourceAuthorizer};

/// Repository port for club membership and ownership mutations.
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Adds a boxer to a club roster.
    async fn add_member(&self, club_id: ClubId, boxer_id: BoxerId) -> AppResult<()>;

    /// Removes a boxer from a club roster, returning whether they were a
    /// member.
    async fn remove_member(&self, club_id: ClubId, boxer_id: BoxerId) -> AppResult<bool>;

    /// Returns the current club owner, if the club exists.
    async fn find_owner(&self, club_id: ClubId) -> AppResult<Option<UserId>>;

    /// Replaces the club owner.
    async fn set_owner(&self, club_id: ClubId, new_owner: UserId) -> AppResult<()>;

    /// Moves a boxer onto a club, replacing any previous assignment.
    async fn assign_boxer_club(&self, boxer_id: BoxerId, club_id: ClubId) -> AppResult<()>;
}

/// Application service for club rosters and ownership.
///
/// Every operation is guarded through the authorizer with the
/// club-owner-scope permissions, and publishes its relationship event
/// before reporting success.
#[derive(Clone)]
pub struct ClubMembershipService {
    authorizer: ResourceAuthorizer,
    repository: Arc<dyn ClubRepository>,
    publisher: Arc<dyn RelationshipEventPublisher>,
}

impl ClubMembershipService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(
        authorizer: ResourceAuthorizer,
        repository: Arc<dyn ClubRepository>,
        publisher: Arc<dyn RelationshipEventPublisher>,
    ) -> Self {
        Self {
            authorizer,
            repository,
            publisher,
        }
    }

    /// Adds a boxer to the club roster.
    pub async fn add_member(
        &self,
        actor: &Subject,
        club_id: ClubId,
        boxer_id: BoxerId,
    ) -> AppResult<()> {
        self.authorizer
            .require(
                actor,
                Permission::ClubManageMembersOwner,
                Some(ResourceRef::club(club_id)),
            )
            .await?;

        self.repository.add_member(club_id, boxer_id).await?;

        self.publisher
            .publish(RelationshipEvent::ClubMemberChanged { club_id, boxer_id })
            .await
    }

    /// Removes a boxer from the club roster.
    pub async fn remove_member(
        &self,
        actor: &Subject,
        club_id: ClubId,
        boxer_id: BoxerId,
    ) -> AppResult<()> {
        self.authorizer
            .require(
                actor,
                Permission::ClubManageMembersOwner,
                Some(ResourceRef::club(club_id)),
            )
            .await?;

        if !self.repository.remove_member(club_id, boxer_id).await? {
            return Err(AppError::NotFound(format!(
                "boxer '{boxer_id}' is not a member of club '{club_id}'"
            )));
        }

        self.publisher
            .publish(RelationshipEvent::ClubMemberChanged { club_id, boxer_id })
            .await
    }

    /// Transfers club ownership to another user.
    pub async fn transfer_ownership(
        &self,
        actor: &Subject,
        club_id: ClubId,
        new_owner: UserId,
    ) -> AppResult<()> {
        self.authorizer
            .require(
                actor,
                Permission::ClubTransferOwner,
                Some(ResourceRef::club(club_id)),
            )
            .await?;

        let Some(previous_owner) = self.repository.find_owner(club_id).await? else {
            return Err(AppError::NotFound(format!("unknown club '{club_id}'")));
        };

        self.repository.set_owner(club_id, new_owner).await?;

        self.publisher
            .publish(RelationshipEvent::ClubOwnershipTransferred {
                club_id,
                previous_owner,
                new_owner,
            })
            .await
    }

    /// Reassigns a boxer to a different club.
    pub async fn reassign_boxer(
        &self,
        actor: &Subject,
        boxer_id: BoxerId,
        club_id: ClubId,
    ) -> AppResult<()> {
        // Guarded by membership management on the destination club.
        self.authorizer
            .require(
                actor,
                Permission::ClubManageMembersOwner,
                Some(ResourceRef::club(club_id)),
            )
            .await?;

        self.repository.assign_boxer_club(boxer_id, club_id).await?;

        self.publisher
            .publish(RelationshipEvent::BoxerReassigned { boxer_id, club_id })
            .await
    }
}
