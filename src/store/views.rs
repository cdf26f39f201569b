// Joined read shapes handed to the request layer. The base record is
// flattened so the JSON matches the record with one extra named relation.
use serde::Serialize;

use crate::store::models::{CheckIn, CommunityPost, Location, PostComment, User};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckInWithLocation {
    #[serde(flatten)]
    pub check_in: CheckIn,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: CommunityPost,
    pub user: User,
    /// Present only when the post references a location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: PostComment,
    pub user: User,
}
