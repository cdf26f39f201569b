use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Level for a points balance: `floor(points / 1000) + 1`.
pub fn level_for(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// Typed record identifiers, so a `UserId` can never be passed where a
/// `PostId` is expected.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

record_id!(UserId);
record_id!(LocationId);
record_id!(RewardId);
record_id!(CheckInId);
record_id!(RedemptionId);
record_id!(PostId);
record_id!(CommentId);
record_id!(
    /// Likes are keyed by (post, user) in the store; the id is only carried
    /// on the record itself.
    LikeId
);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub points: u32,
    pub level: u32,
    pub avatar: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Only the store moves a balance; level follows every change.
    pub(crate) fn set_points(&mut self, points: u32) {
        self.points = points;
        self.level = level_for(points);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Farm,
    Recycling,
    Library,
    Landmark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub description: String,
    pub address: String,
    /// Display label such as "0.3 miles away"
    pub distance: Option<String>,
    /// Awarded on every check-in
    pub points: u32,
    pub image_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RewardCategory {
    Movie,
    GiftCard,
    LocalAttraction,
    Gaming,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardId,
    pub title: String,
    pub description: Option<String>,
    /// Cost to redeem
    pub points: u32,
    pub category: RewardCategory,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// Points are a snapshot of the location's value when the check-in happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub points: u32,
    pub timestamp: DateTime<Utc>,
}

/// Points are a snapshot of the reward's cost when it was redeemed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: RedemptionId,
    pub user_id: UserId,
    pub reward_id: RewardId,
    pub points: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: PostId,
    pub user_id: UserId,
    pub location_id: Option<LocationId>,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub points: u32,
    /// Always equal to the number of likes recorded for this post
    pub likes: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostComment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostLike {
    pub id: LikeId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
}

// --- Inputs ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub description: String,
    pub address: String,
    #[serde(default)]
    pub distance: Option<String>,
    pub points: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReward {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub points: u32,
    pub category: RewardCategory,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunityPost {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub points: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPostComment {
    pub user_id: UserId,
    pub content: String,
}
