pub mod error;
pub mod models;
pub mod table;
pub mod views;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

pub use self::error::{Entity, StoreError};
use self::models::*;
use self::table::Table;
pub use self::views::{CheckInWithLocation, CommentWithAuthor, PostWithAuthor};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const DEFAULT_RECENT_CHECK_INS_LIMIT: usize = 10;
pub const DEFAULT_FEED_LIMIT: usize = 20;

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory record store for users, places, rewards and the community feed.
///
/// Every mutation runs to completion under `&mut self`; a failed operation
/// records nothing. Callers that share the store wrap it in a lock.
pub struct Store {
    users: Table<UserId, User>,
    locations: Table<LocationId, Location>,
    rewards: Table<RewardId, Reward>,
    check_ins: Table<CheckInId, CheckIn>,
    redemptions: Table<RedemptionId, Redemption>,
    posts: Table<PostId, CommunityPost>,
    comments: Table<CommentId, PostComment>,
    likes: HashMap<(PostId, UserId), PostLike>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            users: Table::new(),
            locations: Table::new(),
            rewards: Table::new(),
            check_ins: Table::new(),
            redemptions: Table::new(),
            posts: Table::new(),
            comments: Table::new(),
            likes: HashMap::new(),
            clock,
        }
    }

    fn require_user(&self, user_id: UserId) -> StoreResult<&User> {
        self.users
            .get(&user_id)
            .ok_or(StoreError::NotFound(Entity::User))
    }

    // --- Users ---

    pub fn get_user(&self, user_id: UserId) -> Option<User> {
        self.users.get(&user_id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn create_user(&mut self, new: NewUser) -> StoreResult<User> {
        if self.users.iter().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict(format!(
                "Username '{}' is already taken",
                new.username
            )));
        }
        if self.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!(
                "Email '{}' is already registered",
                new.email
            )));
        }

        let user = User {
            id: UserId::generate(),
            username: new.username,
            email: new.email,
            points: 0,
            level: level_for(0),
            avatar: None,
            joined_at: self.clock.utc(),
        };
        self.users.insert(user.id, user.clone());
        tracing::info!("Created user {} ({})", user.username, user.id);

        Ok(user)
    }

    // --- Locations ---

    pub fn get_locations(&self) -> Vec<Location> {
        self.locations.iter().cloned().collect()
    }

    pub fn get_active_locations(&self) -> Vec<Location> {
        self.locations
            .iter()
            .filter(|l| l.is_active)
            .cloned()
            .collect()
    }

    pub fn get_location(&self, location_id: LocationId) -> Option<Location> {
        self.locations.get(&location_id).cloned()
    }

    pub fn create_location(&mut self, new: NewLocation) -> Location {
        let location = Location {
            id: LocationId::generate(),
            name: new.name,
            kind: new.kind,
            description: new.description,
            address: new.address,
            distance: new.distance,
            points: new.points,
            image_url: new.image_url,
            is_active: new.is_active,
        };
        self.locations.insert(location.id, location.clone());
        tracing::info!("Created location {} ({})", location.name, location.id);

        location
    }

    // --- Rewards ---

    pub fn get_rewards(&self) -> Vec<Reward> {
        self.rewards.iter().cloned().collect()
    }

    pub fn get_active_rewards(&self) -> Vec<Reward> {
        self.rewards.iter().filter(|r| r.is_active).cloned().collect()
    }

    pub fn get_reward(&self, reward_id: RewardId) -> Option<Reward> {
        self.rewards.get(&reward_id).cloned()
    }

    pub fn create_reward(&mut self, new: NewReward) -> Reward {
        let reward = Reward {
            id: RewardId::generate(),
            title: new.title,
            description: new.description,
            points: new.points,
            category: new.category,
            image_url: new.image_url,
            is_active: new.is_active,
        };
        self.rewards.insert(reward.id, reward.clone());
        tracing::info!("Created reward {} ({})", reward.title, reward.id);

        reward
    }

    // --- Check-ins ---

    /// Record a visit and credit the location's current point value.
    ///
    /// The points are copied onto the check-in, so later changes to the
    /// location never rewrite history.
    pub fn create_check_in(
        &mut self,
        user_id: UserId,
        location_id: LocationId,
    ) -> StoreResult<CheckIn> {
        let points = self
            .locations
            .get(&location_id)
            .ok_or(StoreError::NotFound(Entity::Location))?
            .points;
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::NotFound(Entity::User))?;

        let balance = user
            .points
            .checked_add(points)
            .ok_or(StoreError::BalanceOverflow {
                balance: user.points,
                credit: points,
            })?;

        let check_in = CheckIn {
            id: CheckInId::generate(),
            user_id,
            location_id,
            points,
            timestamp: self.clock.utc(),
        };
        user.set_points(balance);
        tracing::info!(
            "User {} checked in at {} for {} points (balance {}, level {})",
            user_id,
            location_id,
            points,
            user.points,
            user.level
        );
        self.check_ins.insert(check_in.id, check_in.clone());

        Ok(check_in)
    }

    pub fn get_user_check_ins(&self, user_id: UserId) -> Vec<CheckIn> {
        self.check_ins
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Newest first; on equal timestamps the later insert comes first.
    pub fn get_recent_check_ins(&self, user_id: UserId, limit: usize) -> Vec<CheckInWithLocation> {
        let mut recent: Vec<&CheckIn> = self
            .check_ins
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        recent
            .into_iter()
            .filter_map(|check_in| {
                let location = self.locations.get(&check_in.location_id)?;
                Some(CheckInWithLocation {
                    check_in: check_in.clone(),
                    location: location.clone(),
                })
            })
            .take(limit)
            .collect()
    }

    // --- Redemptions ---

    /// Spend points on a reward. The cost is checked and charged in one step.
    pub fn create_redemption(
        &mut self,
        user_id: UserId,
        reward_id: RewardId,
    ) -> StoreResult<Redemption> {
        let cost = self
            .rewards
            .get(&reward_id)
            .ok_or(StoreError::NotFound(Entity::Reward))?
            .points;
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::NotFound(Entity::User))?;

        if user.points < cost {
            tracing::warn!(
                "User {} cannot redeem {}: needs {} points, has {}",
                user_id,
                reward_id,
                cost,
                user.points
            );
            return Err(StoreError::InsufficientPoints {
                required: cost,
                available: user.points,
            });
        }

        let redemption = Redemption {
            id: RedemptionId::generate(),
            user_id,
            reward_id,
            points: cost,
            timestamp: self.clock.utc(),
        };
        user.set_points(user.points - cost);
        tracing::info!(
            "User {} redeemed {} for {} points (balance {}, level {})",
            user_id,
            reward_id,
            cost,
            user.points,
            user.level
        );
        self.redemptions.insert(redemption.id, redemption.clone());

        Ok(redemption)
    }

    pub fn get_user_redemptions(&self, user_id: UserId) -> Vec<Redemption> {
        self.redemptions
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    // --- Leaderboard ---

    /// Highest balance first; equal balances keep sign-up order.
    pub fn get_leaderboard(&self, limit: usize) -> Vec<User> {
        let mut ranked: Vec<&User> = self.users.iter().collect();
        ranked.sort_by(|a, b| b.points.cmp(&a.points));
        ranked.into_iter().take(limit).cloned().collect()
    }

    // --- Community posts ---

    pub fn create_community_post(&mut self, new: NewCommunityPost) -> StoreResult<CommunityPost> {
        self.require_user(new.user_id)?;
        if let Some(location_id) = new.location_id {
            if !self.locations.contains(&location_id) {
                return Err(StoreError::NotFound(Entity::Location));
            }
        }

        let post = CommunityPost {
            id: PostId::generate(),
            user_id: new.user_id,
            location_id: new.location_id,
            title: new.title,
            content: new.content,
            image_url: new.image_url,
            points: new.points.unwrap_or(0),
            likes: 0,
            timestamp: self.clock.utc(),
        };
        self.posts.insert(post.id, post.clone());
        tracing::info!("User {} published post {}", post.user_id, post.id);

        Ok(post)
    }

    pub fn get_community_post(&self, post_id: PostId) -> Option<CommunityPost> {
        self.posts.get(&post_id).cloned()
    }

    /// Feed, newest first, with author and optional location attached.
    pub fn get_community_posts(&self, limit: usize) -> Vec<PostWithAuthor> {
        let mut feed: Vec<&CommunityPost> = self.posts.iter().rev().collect();
        feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        feed.into_iter()
            .filter_map(|post| {
                let user = self.users.get(&post.user_id)?;
                let location = post
                    .location_id
                    .and_then(|id| self.locations.get(&id))
                    .cloned();
                Some(PostWithAuthor {
                    post: post.clone(),
                    user: user.clone(),
                    location,
                })
            })
            .take(limit)
            .collect()
    }

    /// Returns true if a new like was recorded, false if it already existed.
    pub fn like_community_post(&mut self, post_id: PostId, user_id: UserId) -> StoreResult<bool> {
        self.require_user(user_id)?;
        let post = self
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::NotFound(Entity::Post))?;

        match self.likes.entry((post_id, user_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(PostLike {
                    id: LikeId::generate(),
                    post_id,
                    user_id,
                    timestamp: self.clock.utc(),
                });
                post.likes += 1;
                tracing::debug!("User {} liked post {} ({} likes)", user_id, post_id, post.likes);
                Ok(true)
            }
        }
    }

    /// Returns true if an existing like was removed.
    pub fn unlike_community_post(&mut self, post_id: PostId, user_id: UserId) -> StoreResult<bool> {
        self.require_user(user_id)?;
        let post = self
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::NotFound(Entity::Post))?;

        if self.likes.remove(&(post_id, user_id)).is_none() {
            return Ok(false);
        }
        post.likes = post.likes.saturating_sub(1);
        tracing::debug!("User {} unliked post {} ({} likes)", user_id, post_id, post.likes);

        Ok(true)
    }

    pub fn has_liked(&self, post_id: PostId, user_id: UserId) -> bool {
        self.likes.contains_key(&(post_id, user_id))
    }

    // --- Comments ---

    pub fn create_post_comment(
        &mut self,
        post_id: PostId,
        new: NewPostComment,
    ) -> StoreResult<PostComment> {
        if !self.posts.contains(&post_id) {
            return Err(StoreError::NotFound(Entity::Post));
        }
        self.require_user(new.user_id)?;

        let comment = PostComment {
            id: CommentId::generate(),
            post_id,
            user_id: new.user_id,
            content: new.content,
            timestamp: self.clock.utc(),
        };
        self.comments.insert(comment.id, comment.clone());
        tracing::info!("User {} commented on post {}", comment.user_id, post_id);

        Ok(comment)
    }

    /// Oldest first, each with its author.
    pub fn get_post_comments(&self, post_id: PostId) -> Vec<CommentWithAuthor> {
        let mut thread: Vec<&PostComment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .collect();
        thread.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        thread
            .into_iter()
            .filter_map(|comment| {
                let user = self.users.get(&comment.user_id)?;
                Some(CommentWithAuthor {
                    comment: comment.clone(),
                    user: user.clone(),
                })
            })
            .collect()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
