use crate::cascade::{self, PostCascadeScope, Requester};
use crate::datastore::{structs::User, Datastore};
use crate::metrics;
use crate::twoface::{Cause, Fallible, TfError};
use actix_web::web;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Build a test service with the API mounted at `/api` over the given mock datastore.
#[cfg(test)]
macro_rules! test_app {
    ($ds:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .data(crate::api::State {
                    ds: std::sync::Arc::new($ds.clone()),
                    post_scope: Default::default(),
                })
                .data(crate::auth::TokenSecret(
                    crate::api::testing::SECRET.to_owned(),
                ))
                .service(
                    actix_web::web::scope("/api")
                        .configure(crate::api::configure::<crate::datastore::mock::Client>),
                ),
        )
        .await
    };
}

pub mod admin;
pub mod bookmarks;
pub mod follows;
pub mod likes;
pub mod tuits;
pub mod users;

pub struct State<DS> {
    pub ds: Arc<DS>,
    pub post_scope: PostCascadeScope,
}

impl<DS> Clone for State<DS> {
    fn clone(&self) -> Self {
        Self {
            ds: Arc::clone(&self.ds),
            post_scope: self.post_scope,
        }
    }
}

/// Mount every userfacing resource.
pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    users::configure::<DS>(cfg);
    tuits::configure::<DS>(cfg);
    bookmarks::configure::<DS>(cfg);
    likes::configure::<DS>(cfg);
    follows::configure::<DS>(cfg);
}

/// How many records a plain (non-cascading) delete removed.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Removed {
    pub removed: usize,
}

/// Resolve a `{uid}` path segment, which is either a user ID or `me` for the requester.
pub fn resolve_user_ref(raw: &str, requester: Option<&Requester>) -> Fallible<Uuid> {
    if raw == "me" {
        guard!(let Some(requester) = requester else {
            return Err(TfError::new(Cause::UserBadAuth, "Log in to use \"me\""));
        });
        return Ok(requester.user_id);
    }
    raw.parse::<Uuid>()
        .map_err(|_| TfError::new(Cause::UserInvalidField, "User IDs must be UUIDs or \"me\""))
}

/// The requester's user record, if they own `owner_id` or are an admin.
async fn authorize_for<DS: Datastore>(
    ds: &DS,
    requester: &Requester,
    owner_id: Uuid,
) -> Fallible<User> {
    let user = cascade::resolve_requester(ds, requester).await?;
    cascade::ensure_owner_or_admin(&user, owner_id)?;
    Ok(user)
}

async fn require_admin<DS: Datastore>(ds: &DS, requester: &Requester) -> Fallible<User> {
    let user = cascade::resolve_requester(ds, requester).await?;
    if !user.admin {
        return Err(TfError::new(Cause::Forbidden, "Only admins can do this"));
    }
    Ok(user)
}

/// Await the handler body, then log its operational metrics, e.g. time taken, whether it returned Ok/Err, etc.
async fn observe<Fut, R>(name: &'static str, body: Fut) -> Fallible<R>
where
    Fut: Future<Output = Fallible<R>>,
{
    let start = Instant::now();
    let return_val = body.await;
    let duration = start.elapsed();
    metrics::HANDLER_SECS
        .with_label_values(&[name])
        .observe(duration.as_secs_f64());
    metrics::RESPONSES
        .with_label_values(&[name, variant_name(&return_val)])
        .inc();
    return_val
}

fn variant_name<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "err"
    }
}
