#[cfg(test)]
pub mod mock;
pub mod postfilters;
pub mod postgres;
pub mod structs;
pub mod tables;

use crate::twoface::Fallible;
use async_trait::async_trait;
use postfilters::{PostFilters, UserFilters};
use structs::{Bookmark, Follow, Like, NewPost, NewUser, Post, PostUpdate, User, UserUpdate};
use uuid::Uuid;

/// The interface for storing users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn new_user(&self, new_user: NewUser) -> Fallible<User>;
    async fn find_user(&self, user_id: Uuid) -> Fallible<Option<User>>;
    async fn list_users(&self, filters: UserFilters) -> Fallible<Vec<User>>;
    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> Fallible<Option<User>>;
    /// Removes only the user row. Anything referencing the user is the caller's problem, see
    /// `cascade::delete_user`.
    async fn delete_user(&self, user_id: Uuid) -> Fallible<Option<User>>;
}

/// The interface for storing tuits.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn new_post(&self, new_post: NewPost) -> Fallible<Post>;
    async fn find_post(&self, post_id: Uuid) -> Fallible<Option<Post>>;
    async fn list_posts(&self, filters: PostFilters) -> Fallible<Vec<Post>>;
    async fn posts_by_author(&self, user_id: Uuid) -> Fallible<Vec<Post>>;
    async fn update_post(&self, post_id: Uuid, update: PostUpdate) -> Fallible<Option<Post>>;
    async fn delete_post(&self, post_id: Uuid) -> Fallible<Option<Post>>;
    /// Returns how many posts were removed.
    async fn delete_posts_by_author(&self, user_id: Uuid) -> Fallible<usize>;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn new_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Bookmark>;
    async fn find_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Option<Bookmark>>;
    async fn bookmarks_by_user(&self, user_id: Uuid) -> Fallible<Vec<Bookmark>>;
    async fn bookmarks_of_post(&self, post_id: Uuid) -> Fallible<Vec<Bookmark>>;
    async fn delete_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<usize>;
    async fn delete_bookmarks_of_post(&self, post_id: Uuid) -> Fallible<usize>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn new_like(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Like>;
    async fn likes_by_user(&self, user_id: Uuid) -> Fallible<Vec<Like>>;
    async fn likes_of_post(&self, post_id: Uuid) -> Fallible<Vec<Like>>;
    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Fallible<usize>;
    async fn delete_likes_of_post(&self, post_id: Uuid) -> Fallible<usize>;
    async fn delete_likes_by_user(&self, user_id: Uuid) -> Fallible<usize>;
}

#[async_trait]
pub trait FollowStore: Send + Sync {
    async fn new_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Fallible<Follow>;
    /// Follows where `user_id` is the one being followed.
    async fn followers(&self, user_id: Uuid) -> Fallible<Vec<Follow>>;
    /// Follows where `user_id` is the one following.
    async fn following(&self, user_id: Uuid) -> Fallible<Vec<Follow>>;
    async fn delete_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Fallible<usize>;
}

/// Everything the API and the cascade orchestrator need from storage.
pub trait Datastore:
    UserStore + PostStore + BookmarkStore + LikeStore + FollowStore + Clone + 'static
{
}

impl<T> Datastore for T where
    T: UserStore + PostStore + BookmarkStore + LikeStore + FollowStore + Clone + 'static
{
}
