use crate::datastore::postfilters::{PostFilters, UserFilters};
use crate::datastore::tables::{bookmarks, follows, likes, posts, users};
use chrono::{offset::Utc, DateTime};
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user of the website.
#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biography: Option<String>,
    pub profile_photo: Option<String>,
    pub account_type: AccountType,
    pub admin: bool,
}

impl User {
    #[allow(dead_code)]
    /// Does this user match all specified filters?
    pub fn matches(&self, filters: &UserFilters) -> bool {
        if let Some(username) = &filters.username {
            if username != &self.username {
                return false;
            }
        }
        if let Some(email) = &filters.email {
            if email != &self.email {
                return false;
            }
        }
        true
    }

    #[allow(dead_code)]
    /// Apply the set fields of a profile update, leaving the rest alone.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if update.first_name.is_some() {
            self.first_name = update.first_name;
        }
        if update.last_name.is_some() {
            self.last_name = update.last_name;
        }
        if update.biography.is_some() {
            self.biography = update.biography;
        }
        if update.profile_photo.is_some() {
            self.profile_photo = update.profile_photo;
        }
        if let Some(account_type) = update.account_type {
            self.account_type = account_type;
        }
    }
}

#[derive(DbEnum, Debug, PartialEq, Serialize, Deserialize, Clone, Copy, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Personal,
    Academic,
    Professional,
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Personal
    }
}

/// Parameters for the database statement which inserts new users.
#[derive(Insertable, Deserialize, Clone, Debug)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub admin: bool,
}

/// Profile fields a user may change. Unset fields are left as they are.
#[derive(AsChangeset, Deserialize, Default, Clone, Debug)]
#[table_name = "users"]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biography: Option<String>,
    pub profile_photo: Option<String>,
    pub account_type: Option<AccountType>,
}

impl UserUpdate {
    /// Diesel refuses to run an UPDATE with nothing in its SET clause.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.biography.is_none()
            && self.profile_photo.is_none()
            && self.account_type.is_none()
    }
}

/// A tuit, i.e. a short post from a user.
#[derive(
    Queryable, Identifiable, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Associations,
)]
#[belongs_to(User, foreign_key = "posted_by")]
pub struct Post {
    pub id: Uuid,
    pub posted_on: DateTime<Utc>,
    pub text: String,
    pub posted_by: Uuid,
}

impl Post {
    #[allow(dead_code)]
    /// Does this post match all specified filters?
    pub fn matches(&self, filters: &PostFilters) -> bool {
        if let Some(id) = &filters.id {
            if id != &self.id {
                return false;
            }
        }
        if let Some(posted_by) = &filters.posted_by {
            if posted_by != &self.posted_by {
                return false;
            }
        }
        if let Some(substring) = &filters.text_contains {
            if !self.text.contains(substring) {
                return false;
            }
        }
        if let Some(before) = filters.posted_before {
            if self.posted_on >= before {
                return false;
            }
        }
        if let Some(after) = filters.posted_after {
            if self.posted_on <= after {
                return false;
            }
        }
        true
    }
}

/// Parameters for the database statement which inserts new posts.
#[derive(Insertable, Clone, Debug)]
#[table_name = "posts"]
pub struct NewPost {
    pub text: String,
    pub posted_by: Uuid,
}

#[derive(AsChangeset, Serialize, Deserialize, Clone, Debug)]
#[table_name = "posts"]
pub struct PostUpdate {
    pub text: String,
}

/// A user keeping a tuit for later.
#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[table_name = "bookmarks"]
pub struct Bookmark {
    pub bookmarked_by: Uuid,
    pub bookmarked_tuit: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(bookmarked_by: Uuid, bookmarked_tuit: Uuid) -> Self {
        Self {
            bookmarked_by,
            bookmarked_tuit,
            created_at: Utc::now(),
        }
    }
}

/// A user liking a tuit.
#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[table_name = "likes"]
pub struct Like {
    pub liked_by: Uuid,
    pub tuit: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(liked_by: Uuid, tuit: Uuid) -> Self {
        Self {
            liked_by,
            tuit,
            created_at: Utc::now(),
        }
    }
}

/// A directed edge: `user_following` reads what `user_followed` posts.
#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[table_name = "follows"]
pub struct Follow {
    pub user_following: Uuid,
    pub user_followed: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(user_following: Uuid, user_followed: Uuid) -> Self {
        Self {
            user_following,
            user_followed,
            created_at: Utc::now(),
        }
    }
}
