use crate::api::{authorize_for, observe, require_admin, resolve_user_ref, State};
use crate::cascade::{self, Requester, UserDeletion};
use crate::datastore::{
    postfilters::UserFilters,
    structs::{NewUser, User, UserUpdate},
    Datastore,
};
use crate::twoface::{Cause, Fallible, OrNotFound, TfError};
use actix_web::web;
use tracing::info;

pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::get().to(list_users::<DS>))
            .route(web::post().to(create_user::<DS>)),
    )
    .service(web::resource("/users/search").route(web::get().to(search_users::<DS>)))
    .service(
        web::resource("/users/{uid}")
            .route(web::get().to(get_user::<DS>))
            .route(web::put().to(update_user::<DS>))
            .route(web::delete().to(delete_user::<DS>)),
    );
}

async fn list_users<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
) -> Fallible<web::Json<Vec<User>>> {
    observe("list_users", async {
        require_admin(&*state.ds, &requester).await?;
        let users = state.ds.list_users(UserFilters::default()).await?;
        Ok(web::Json(users))
    })
    .await
}

async fn search_users<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    filters: web::Query<UserFilters>,
) -> Fallible<web::Json<Vec<User>>> {
    observe("search_users", async {
        require_admin(&*state.ds, &requester).await?;
        let users = state.ds.list_users(filters.into_inner()).await?;
        Ok(web::Json(users))
    })
    .await
}

async fn create_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    body: web::Json<NewUser>,
) -> Fallible<web::Json<User>> {
    observe("create_user", async {
        let new_user = body.into_inner();
        if new_user.username.trim().is_empty() {
            return Err(TfError::new(
                Cause::UserInvalidField,
                "Usernames can't be empty",
            ));
        }
        if new_user.admin {
            guard!(let Some(requester) = &requester else {
                return Err(TfError::new(Cause::UserBadAuth, "Log in to create admins"));
            });
            require_admin(&*state.ds, requester).await?;
        }
        let user = state.ds.new_user(new_user).await?;
        info!(user_id = %user.id, "created user");
        Ok(web::Json(user))
    })
    .await
}

async fn get_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    uid: web::Path<String>,
) -> Fallible<web::Json<User>> {
    observe("get_user", async {
        let user_id = resolve_user_ref(&uid, requester.as_ref())?;
        let user = state
            .ds
            .find_user(user_id)
            .await?
            .or_not_found("User not found")?;
        Ok(web::Json(user))
    })
    .await
}

async fn update_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    uid: web::Path<String>,
    body: web::Json<UserUpdate>,
) -> Fallible<web::Json<User>> {
    observe("update_user", async {
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        let user = state
            .ds
            .update_user(user_id, body.into_inner())
            .await?
            .or_not_found("User not found")?;
        Ok(web::Json(user))
    })
    .await
}

/// Deletes the user and everything referencing them.
async fn delete_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    uid: web::Path<String>,
) -> Fallible<web::Json<UserDeletion>> {
    observe("delete_user", async {
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        let deletion = cascade::delete_user(&*state.ds, &requester, user_id).await?;
        Ok(web::Json(deletion))
    })
    .await
}
