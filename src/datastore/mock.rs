use crate::datastore::{
    postfilters::{PostFilters, UserFilters},
    structs::{Bookmark, Follow, Like, NewPost, NewUser, Post, PostUpdate, User, UserUpdate},
    BookmarkStore, FollowStore, LikeStore, PostStore, UserStore,
};
use crate::twoface::{describe_diesel, Cause, Fallible, TfError};
use async_trait::async_trait;
use chrono::offset::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

type Store<T> = Arc<Mutex<Vec<T>>>;

/// A mock implementation of every datastore trait. Clones share the same collections.
#[derive(Clone, Default, Debug)]
pub struct Client {
    users: Store<User>,
    posts: Store<Post>,
    bookmarks: Store<Bookmark>,
    likes: Store<Like>,
    follows: Store<Follow>,
    fail_on: Arc<Mutex<Option<&'static str>>>,
}

/// A copy of every collection, for comparing the store before and after an operation.
#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub bookmarks: Vec<Bookmark>,
    pub likes: Vec<Like>,
    pub follows: Vec<Follow>,
}

impl Client {
    /// Make every call to the named operation (e.g. "delete_likes_of_post") fail as if the
    /// database had gone away.
    pub fn fail_on(&self, operation: &'static str) {
        *self.fail_on.lock().unwrap() = Some(operation);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.lock().unwrap().clone(),
            posts: self.posts.lock().unwrap().clone(),
            bookmarks: self.bookmarks.lock().unwrap().clone(),
            likes: self.likes.lock().unwrap().clone(),
            follows: self.follows.lock().unwrap().clone(),
        }
    }

    fn check(&self, operation: &'static str) -> Fallible<()> {
        if *self.fail_on.lock().unwrap() == Some(operation) {
            return Err(TfError::new(Cause::StoreUnavailable, "Database is unavailable"));
        }
        Ok(())
    }
}

fn remove_where<T, F: Fn(&T) -> bool>(store: &Store<T>, predicate: F) -> usize {
    let mut items = store.lock().unwrap();
    let before = items.len();
    items.retain(|item| !predicate(item));
    before - items.len()
}

fn find_all<T: Clone, F: Fn(&T) -> bool>(store: &Store<T>, predicate: F) -> Vec<T> {
    store
        .lock()
        .unwrap()
        .iter()
        .filter(|item| predicate(item))
        .cloned()
        .collect()
}

fn conflict() -> TfError {
    TfError::new(Cause::UserConflict, "That record already exists")
}

/// The error Postgres raises when deleting a row that a foreign key still points at.
fn still_referenced(table: &str) -> TfError {
    describe_diesel(DieselError::DatabaseError(
        DatabaseErrorKind::ForeignKeyViolation,
        Box::new(format!("row is still referenced from table \"{}\"", table)),
    ))
}

impl Client {
    fn ensure_post_unreferenced(&self, post_id: Uuid) -> Fallible<()> {
        if self.likes.lock().unwrap().iter().any(|l| l.tuit == post_id) {
            return Err(still_referenced("likes"));
        }
        if self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.bookmarked_tuit == post_id)
        {
            return Err(still_referenced("bookmarks"));
        }
        Ok(())
    }

    fn ensure_user_unreferenced(&self, user_id: Uuid) -> Fallible<()> {
        if self
            .follows
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.user_following == user_id || f.user_followed == user_id)
        {
            return Err(still_referenced("follows"));
        }
        if self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.bookmarked_by == user_id)
        {
            return Err(still_referenced("bookmarks"));
        }
        if self.likes.lock().unwrap().iter().any(|l| l.liked_by == user_id) {
            return Err(still_referenced("likes"));
        }
        if self.posts.lock().unwrap().iter().any(|p| p.posted_by == user_id) {
            return Err(still_referenced("posts"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for Client {
    async fn new_user(&self, new_user: NewUser) -> Fallible<User> {
        self.check("new_user")?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(conflict());
        }
        let user = User {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            biography: new_user.biography,
            profile_photo: new_user.profile_photo,
            account_type: new_user.account_type,
            admin: new_user.admin,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> Fallible<Option<User>> {
        self.check("find_user")?;
        Ok(find_all(&self.users, |u| u.id == user_id).pop())
    }

    async fn list_users(&self, filters: UserFilters) -> Fallible<Vec<User>> {
        self.check("list_users")?;
        Ok(find_all(&self.users, |u| u.matches(&filters)))
    }

    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> Fallible<Option<User>> {
        self.check("update_user")?;
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == user_id).map(|user| {
            user.apply(update);
            user.clone()
        }))
    }

    async fn delete_user(&self, user_id: Uuid) -> Fallible<Option<User>> {
        self.check("delete_user")?;
        self.ensure_user_unreferenced(user_id)?;
        let mut users = self.users.lock().unwrap();
        let position = users.iter().position(|u| u.id == user_id);
        Ok(position.map(|i| users.remove(i)))
    }
}

#[async_trait]
impl PostStore for Client {
    async fn new_post(&self, new_post: NewPost) -> Fallible<Post> {
        self.check("new_post")?;
        let post = Post {
            id: Uuid::new_v4(),
            posted_on: Utc::now(),
            text: new_post.text,
            posted_by: new_post.posted_by,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Fallible<Option<Post>> {
        self.check("find_post")?;
        Ok(find_all(&self.posts, |p| p.id == post_id).pop())
    }

    async fn list_posts(&self, filters: PostFilters) -> Fallible<Vec<Post>> {
        self.check("list_posts")?;
        let mut posts = find_all(&self.posts, |p| p.matches(&filters));
        posts.truncate(filters.limit as usize);
        Ok(posts)
    }

    async fn posts_by_author(&self, user_id: Uuid) -> Fallible<Vec<Post>> {
        self.check("posts_by_author")?;
        Ok(find_all(&self.posts, |p| p.posted_by == user_id))
    }

    async fn update_post(&self, post_id: Uuid, update: PostUpdate) -> Fallible<Option<Post>> {
        self.check("update_post")?;
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.iter_mut().find(|p| p.id == post_id).map(|post| {
            post.text = update.text;
            post.clone()
        }))
    }

    async fn delete_post(&self, post_id: Uuid) -> Fallible<Option<Post>> {
        self.check("delete_post")?;
        self.ensure_post_unreferenced(post_id)?;
        let mut posts = self.posts.lock().unwrap();
        let position = posts.iter().position(|p| p.id == post_id);
        Ok(position.map(|i| posts.remove(i)))
    }

    async fn delete_posts_by_author(&self, user_id: Uuid) -> Fallible<usize> {
        self.check("delete_posts_by_author")?;
        for post in find_all(&self.posts, |p| p.posted_by == user_id) {
            self.ensure_post_unreferenced(post.id)?;
        }
        Ok(remove_where(&self.posts, |p| p.posted_by == user_id))
    }
}

#[async_trait]
impl BookmarkStore for Client {
    async fn new_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Bookmark> {
        self.check("new_bookmark")?;
        let mut bookmarks = self.bookmarks.lock().unwrap();
        if bookmarks
            .iter()
            .any(|b| b.bookmarked_by == user_id && b.bookmarked_tuit == post_id)
        {
            return Err(conflict());
        }
        let bookmark = Bookmark::new(user_id, post_id);
        bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn find_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Option<Bookmark>> {
        self.check("find_bookmark")?;
        Ok(find_all(&self.bookmarks, |b| {
            b.bookmarked_by == user_id && b.bookmarked_tuit == post_id
        })
        .pop())
    }

    async fn bookmarks_by_user(&self, user_id: Uuid) -> Fallible<Vec<Bookmark>> {
        self.check("bookmarks_by_user")?;
        Ok(find_all(&self.bookmarks, |b| b.bookmarked_by == user_id))
    }

    async fn bookmarks_of_post(&self, post_id: Uuid) -> Fallible<Vec<Bookmark>> {
        self.check("bookmarks_of_post")?;
        Ok(find_all(&self.bookmarks, |b| b.bookmarked_tuit == post_id))
    }

    async fn delete_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<usize> {
        self.check("delete_bookmark")?;
        Ok(remove_where(&self.bookmarks, |b| {
            b.bookmarked_by == user_id && b.bookmarked_tuit == post_id
        }))
    }

    async fn delete_bookmarks_of_post(&self, post_id: Uuid) -> Fallible<usize> {
        self.check("delete_bookmarks_of_post")?;
        Ok(remove_where(&self.bookmarks, |b| b.bookmarked_tuit == post_id))
    }
}

#[async_trait]
impl LikeStore for Client {
    async fn new_like(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Like> {
        self.check("new_like")?;
        let mut likes = self.likes.lock().unwrap();
        if likes.iter().any(|l| l.liked_by == user_id && l.tuit == post_id) {
            return Err(conflict());
        }
        let like = Like::new(user_id, post_id);
        likes.push(like.clone());
        Ok(like)
    }

    async fn likes_by_user(&self, user_id: Uuid) -> Fallible<Vec<Like>> {
        self.check("likes_by_user")?;
        Ok(find_all(&self.likes, |l| l.liked_by == user_id))
    }

    async fn likes_of_post(&self, post_id: Uuid) -> Fallible<Vec<Like>> {
        self.check("likes_of_post")?;
        Ok(find_all(&self.likes, |l| l.tuit == post_id))
    }

    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Fallible<usize> {
        self.check("delete_like")?;
        Ok(remove_where(&self.likes, |l| {
            l.liked_by == user_id && l.tuit == post_id
        }))
    }

    async fn delete_likes_of_post(&self, post_id: Uuid) -> Fallible<usize> {
        self.check("delete_likes_of_post")?;
        Ok(remove_where(&self.likes, |l| l.tuit == post_id))
    }

    async fn delete_likes_by_user(&self, user_id: Uuid) -> Fallible<usize> {
        self.check("delete_likes_by_user")?;
        Ok(remove_where(&self.likes, |l| l.liked_by == user_id))
    }
}

#[async_trait]
impl FollowStore for Client {
    async fn new_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Fallible<Follow> {
        self.check("new_follow")?;
        let mut follows = self.follows.lock().unwrap();
        if follows
            .iter()
            .any(|f| f.user_following == follower_id && f.user_followed == followed_id)
        {
            return Err(conflict());
        }
        let follow = Follow::new(follower_id, followed_id);
        follows.push(follow.clone());
        Ok(follow)
    }

    async fn followers(&self, user_id: Uuid) -> Fallible<Vec<Follow>> {
        self.check("followers")?;
        Ok(find_all(&self.follows, |f| f.user_followed == user_id))
    }

    async fn following(&self, user_id: Uuid) -> Fallible<Vec<Follow>> {
        self.check("following")?;
        Ok(find_all(&self.follows, |f| f.user_following == user_id))
    }

    async fn delete_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Fallible<usize> {
        self.check("delete_follow")?;
        Ok(remove_where(&self.follows, |f| {
            f.user_following == follower_id && f.user_followed == followed_id
        }))
    }
}
