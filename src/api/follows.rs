use crate::api::{authorize_for, observe, resolve_user_ref, Removed, State};
use crate::cascade::Requester;
use crate::datastore::{structs::Follow, Datastore};
use crate::twoface::{Cause, Fallible, OrNotFound, TfError};
use actix_web::web;
use uuid::Uuid;

pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/{uid}/following").route(web::get().to(following::<DS>)))
        .service(web::resource("/users/{uid}/followers").route(web::get().to(followers::<DS>)))
        .service(
            web::resource("/users/{uid}/follows/{other}")
                .route(web::post().to(follow::<DS>))
                .route(web::delete().to(unfollow::<DS>)),
        );
}

async fn following<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    uid: web::Path<String>,
) -> Fallible<web::Json<Vec<Follow>>> {
    observe("following", async {
        let user_id = resolve_user_ref(&uid, requester.as_ref())?;
        Ok(web::Json(state.ds.following(user_id).await?))
    })
    .await
}

async fn followers<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    uid: web::Path<String>,
) -> Fallible<web::Json<Vec<Follow>>> {
    observe("followers", async {
        let user_id = resolve_user_ref(&uid, requester.as_ref())?;
        Ok(web::Json(state.ds.followers(user_id).await?))
    })
    .await
}

async fn follow<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<Follow>> {
    observe("follow", async {
        let (uid, followed_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        if user_id == followed_id {
            return Err(TfError::new(
                Cause::UserActionInvalid,
                "Users can't follow themselves",
            ));
        }
        authorize_for(&*state.ds, &requester, user_id).await?;
        state
            .ds
            .find_user(followed_id)
            .await?
            .or_not_found("User not found")?;
        Ok(web::Json(state.ds.new_follow(user_id, followed_id).await?))
    })
    .await
}

async fn unfollow<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<Removed>> {
    observe("unfollow", async {
        let (uid, followed_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        let removed = state.ds.delete_follow(user_id, followed_id).await?;
        if removed == 0 {
            return Err(TfError::new(Cause::NotFound, "Follow not found"));
        }
        Ok(web::Json(Removed { removed }))
    })
    .await
}
