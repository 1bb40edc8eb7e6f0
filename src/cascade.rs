//! Deleting a user or a tuit, along with every follow, bookmark, like and tuit that would otherwise
//! be left pointing at it.
//!
//! Each step is a separate store call, awaited in order. There is no transaction around a cascade:
//! if a store call fails, the error is returned as-is and the steps before it stay committed. The
//! steps are ordered so that join records go before the entities they reference, so a partial
//! cascade never leaves a join record pointing at a deleted user or tuit.
use crate::datastore::structs::{Bookmark, Post, User};
use crate::datastore::Datastore;
use crate::metrics;
use crate::twoface::{Cause, Fallible, OrNotFound, TfError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: Uuid,
}

/// What deleting one tuit takes down with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostCascadeScope {
    /// Only the tuit, its bookmarks and its likes.
    SinglePost,
    /// Every tuit by the same author, their bookmarks and likes, plus the author's own bookmarks
    /// and likes. This is how tuit deletion historically behaved.
    AuthorWide,
}

impl Default for PostCascadeScope {
    fn default() -> Self {
        Self::SinglePost
    }
}

/// How many records of each kind a cascade removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub follows: usize,
    pub bookmarks: usize,
    pub likes: usize,
    pub posts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDeletion {
    pub user: User,
    pub removed: CascadeReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDeletion {
    pub posts: Vec<Post>,
    pub removed: CascadeReport,
}

/// Result of toggling a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "bookmark", rename_all = "snake_case")]
pub enum BookmarkToggle {
    Created(Bookmark),
    Removed,
}

/// Look up the requester's own user record. A token for a user that no longer exists is treated
/// like no token at all.
pub async fn resolve_requester<DS: Datastore>(ds: &DS, requester: &Requester) -> Fallible<User> {
    guard!(let Some(user) = ds.find_user(requester.user_id).await? else {
        return Err(TfError::new(Cause::UserBadAuth, "Please log in again"));
    });
    Ok(user)
}

/// Only the owner of a resource, or an admin, may change it.
pub fn ensure_owner_or_admin(requester: &User, owner_id: Uuid) -> Fallible<()> {
    if requester.admin || requester.id == owner_id {
        Ok(())
    } else {
        Err(TfError::new(
            Cause::Forbidden,
            "Only the owner or an admin may do this",
        ))
    }
}

/// Delete a user and everything that references them.
#[instrument(skip(ds))]
pub async fn delete_user<DS: Datastore>(
    ds: &DS,
    requester: &Requester,
    target_id: Uuid,
) -> Fallible<UserDeletion> {
    let requester = resolve_requester(ds, requester).await?;
    ensure_owner_or_admin(&requester, target_id)?;
    ds.find_user(target_id).await?.or_not_found("User not found")?;

    let mut removed = CascadeReport::default();

    for follow in ds.followers(target_id).await? {
        removed.follows += ds
            .delete_follow(follow.user_following, follow.user_followed)
            .await?;
    }
    for follow in ds.following(target_id).await? {
        removed.follows += ds
            .delete_follow(follow.user_following, follow.user_followed)
            .await?;
    }
    info!(count = removed.follows, "removed follows");

    for bookmark in ds.bookmarks_by_user(target_id).await? {
        removed.bookmarks += ds
            .delete_bookmark(bookmark.bookmarked_by, bookmark.bookmarked_tuit)
            .await?;
    }
    info!(count = removed.bookmarks, "removed the user's bookmarks");

    let posts = ds.posts_by_author(target_id).await?;
    remove_references_to_posts(ds, &posts, &mut removed).await?;

    removed.likes += ds.delete_likes_by_user(target_id).await?;
    info!(count = removed.likes, "removed likes");

    removed.posts += ds.delete_posts_by_author(target_id).await?;
    info!(count = removed.posts, "removed tuits");

    let user = ds
        .delete_user(target_id)
        .await?
        .or_not_found("User not found")?;
    metrics::record_cascade("user", &removed);
    info!("deleted user");
    Ok(UserDeletion { user, removed })
}

/// Delete a tuit and the bookmarks and likes that reference it. With
/// `PostCascadeScope::AuthorWide` this takes down every tuit by the same author instead.
#[instrument(skip(ds))]
pub async fn delete_post<DS: Datastore>(
    ds: &DS,
    requester: &Requester,
    post_id: Uuid,
    scope: PostCascadeScope,
) -> Fallible<PostDeletion> {
    let post = ds.find_post(post_id).await?.or_not_found("Tuit not found")?;
    let author = ds
        .find_user(post.posted_by)
        .await?
        .or_not_found("Tuit author not found")?;
    let requester = resolve_requester(ds, requester).await?;
    ensure_owner_or_admin(&requester, author.id)?;

    let deletion = match scope {
        PostCascadeScope::SinglePost => delete_single_post(ds, post).await?,
        PostCascadeScope::AuthorWide => delete_posts_of_author(ds, author.id).await?,
    };
    metrics::record_cascade("post", &deletion.removed);
    Ok(deletion)
}

async fn delete_single_post<DS: Datastore>(ds: &DS, post: Post) -> Fallible<PostDeletion> {
    let mut removed = CascadeReport::default();
    remove_references_to_posts(ds, std::slice::from_ref(&post), &mut removed).await?;

    let posts: Vec<Post> = ds.delete_post(post.id).await?.into_iter().collect();
    removed.posts = posts.len();
    info!(post_id = %post.id, "deleted tuit");
    Ok(PostDeletion { posts, removed })
}

async fn delete_posts_of_author<DS: Datastore>(ds: &DS, author_id: Uuid) -> Fallible<PostDeletion> {
    let mut removed = CascadeReport::default();

    for bookmark in ds.bookmarks_by_user(author_id).await? {
        removed.bookmarks += ds
            .delete_bookmark(bookmark.bookmarked_by, bookmark.bookmarked_tuit)
            .await?;
    }
    info!(count = removed.bookmarks, "removed the author's bookmarks");

    let posts = ds.posts_by_author(author_id).await?;
    remove_references_to_posts(ds, &posts, &mut removed).await?;

    removed.likes += ds.delete_likes_by_user(author_id).await?;
    removed.posts = ds.delete_posts_by_author(author_id).await?;
    info!(count = removed.posts, "deleted every tuit by the author");
    Ok(PostDeletion { posts, removed })
}

/// Remove the likes, then the bookmarks, of each post. The posts themselves are left alone.
async fn remove_references_to_posts<DS: Datastore>(
    ds: &DS,
    posts: &[Post],
    removed: &mut CascadeReport,
) -> Fallible<()> {
    for post in posts {
        let likes = ds.delete_likes_of_post(post.id).await?;
        let bookmarks = ds.delete_bookmarks_of_post(post.id).await?;
        info!(post_id = %post.id, likes, bookmarks, "removed references to tuit");
        removed.likes += likes;
        removed.bookmarks += bookmarks;
    }
    Ok(())
}

/// Bookmark the tuit if the user hasn't yet, otherwise remove the bookmark.
///
/// This is check-then-act. Two concurrent toggles can both see "no bookmark"; the store's
/// uniqueness rule then turns the second create into a `UserConflict`.
#[instrument(skip(ds))]
pub async fn toggle_bookmark<DS: Datastore>(
    ds: &DS,
    requester: &Requester,
    user_id: Uuid,
    post_id: Uuid,
) -> Fallible<BookmarkToggle> {
    let requester = resolve_requester(ds, requester).await?;
    ensure_owner_or_admin(&requester, user_id)?;
    ds.find_user(user_id).await?.or_not_found("User not found")?;
    ds.find_post(post_id).await?.or_not_found("Tuit not found")?;

    if ds.find_bookmark(user_id, post_id).await?.is_some() {
        ds.delete_bookmark(user_id, post_id).await?;
        info!("removed bookmark");
        Ok(BookmarkToggle::Removed)
    } else {
        let bookmark = ds.new_bookmark(user_id, post_id).await?;
        info!("created bookmark");
        Ok(BookmarkToggle::Created(bookmark))
    }
}
