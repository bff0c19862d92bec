use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use ringmate_application::RelationshipOracle;
use ringmate_core::{AppResult, BoxerId, ClubId, UserId};
use ringmate_domain::{CoachPermission, ResourceKind, ResourceRef};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory relationship oracle for development and tests.
///
/// Holds the same fact tables the PostgreSQL oracle queries, mutable
/// through seeding methods so tests can flip a relationship between
/// evaluations. Accounts are active unless explicitly deactivated.
#[derive(Default)]
pub struct InMemoryRelationshipOracle {
    boxer_owners: RwLock<HashMap<BoxerId, UserId>>,
    club_owners: RwLock<HashMap<ClubId, UserId>>,
    boxer_clubs: RwLock<HashMap<BoxerId, ClubId>>,
    availability_boxers: RwLock<HashMap<Uuid, BoxerId>>,
    match_request_boxers: RwLock<HashMap<Uuid, BoxerId>>,
    coach_links: RwLock<HashMap<(UserId, BoxerId), CoachPermission>>,
    deactivated: RwLock<HashSet<UserId>>,
}

impl InMemoryRelationshipOracle {
    /// Creates an empty oracle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the owner of a boxer profile.
    pub async fn set_boxer_owner(&self, boxer_id: BoxerId, owner: UserId) {
        self.boxer_owners.write().await.insert(boxer_id, owner);
    }

    /// Records the owner of a club.
    pub async fn set_club_owner(&self, club_id: ClubId, owner: UserId) {
        self.club_owners.write().await.insert(club_id, owner);
    }

    /// Records the club a boxer belongs to.
    pub async fn set_boxer_club(&self, boxer_id: BoxerId, club_id: ClubId) {
        self.boxer_clubs.write().await.insert(boxer_id, club_id);
    }

    /// Records the boxer an availability window belongs to.
    pub async fn set_availability_boxer(&self, availability_id: Uuid, boxer_id: BoxerId) {
        self.availability_boxers
            .write()
            .await
            .insert(availability_id, boxer_id);
    }

    /// Records the boxer a match request was created for.
    pub async fn set_match_request_boxer(&self, match_request_id: Uuid, boxer_id: BoxerId) {
        self.match_request_boxers
            .write()
            .await
            .insert(match_request_id, boxer_id);
    }

    /// Records or re-levels a coach link.
    pub async fn set_coach_link(&self, coach: UserId, boxer_id: BoxerId, level: CoachPermission) {
        self.coach_links.write().await.insert((coach, boxer_id), level);
    }

    /// Removes a coach link.
    pub async fn remove_coach_link(&self, coach: UserId, boxer_id: BoxerId) {
        self.coach_links.write().await.remove(&(coach, boxer_id));
    }

    /// Sets whether an account is active.
    pub async fn set_active(&self, user_id: UserId, active: bool) {
        let mut deactivated = self.deactivated.write().await;
        if active {
            deactivated.remove(&user_id);
        } else {
            deactivated.insert(user_id);
        }
    }

    async fn boxer_owned_by(&self, boxer_id: BoxerId, user_id: UserId) -> bool {
        self.boxer_owners.read().await.get(&boxer_id) == Some(&user_id)
    }
}

#[async_trait]
impl RelationshipOracle for InMemoryRelationshipOracle {
    async fn is_owner(&self, user_id: UserId, resource: ResourceRef) -> AppResult<bool> {
        let owned = match resource.kind() {
            ResourceKind::Boxer => {
                self.boxer_owned_by(BoxerId::from_uuid(resource.id()), user_id)
                    .await
            }
            ResourceKind::Club => {
                self.club_owners
                    .read()
                    .await
                    .get(&ClubId::from_uuid(resource.id()))
                    == Some(&user_id)
            }
            ResourceKind::Availability => {
                match self.availability_boxers.read().await.get(&resource.id()) {
                    Some(boxer_id) => self.boxer_owned_by(*boxer_id, user_id).await,
                    None => false,
                }
            }
            ResourceKind::MatchRequest => {
                match self.match_request_boxers.read().await.get(&resource.id()) {
                    Some(boxer_id) => self.boxer_owned_by(*boxer_id, user_id).await,
                    None => false,
                }
            }
        };

        Ok(owned)
    }

    async fn coach_link_level(
        &self,
        coach_user_id: UserId,
        boxer_id: BoxerId,
    ) -> AppResult<Option<CoachPermission>> {
        Ok(self
            .coach_links
            .read()
            .await
            .get(&(coach_user_id, boxer_id))
            .copied())
    }

    async fn owns_club_of_boxer(&self, user_id: UserId, boxer_id: BoxerId) -> AppResult<bool> {
        let Some(club_id) = self.boxer_clubs.read().await.get(&boxer_id).copied() else {
            return Ok(false);
        };

        Ok(self.club_owners.read().await.get(&club_id) == Some(&user_id))
    }

    async fn is_active(&self, user_id: UserId) -> AppResult<bool> {
        Ok(!self.deactivated.read().await.contains(&user_id))
    }
}
