use crate::api::{authorize_for, observe, resolve_user_ref, Removed, State};
use crate::cascade::Requester;
use crate::datastore::{structs::Like, Datastore};
use crate::twoface::{Cause, Fallible, OrNotFound, TfError};
use actix_web::web;
use uuid::Uuid;

pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/{uid}/likes").route(web::get().to(likes_by_user::<DS>)))
        .service(web::resource("/tuits/{tid}/likes").route(web::get().to(likes_of_tuit::<DS>)))
        .service(
            web::resource("/users/{uid}/likes/{tid}")
                .route(web::post().to(like::<DS>))
                .route(web::delete().to(unlike::<DS>)),
        );
}

async fn likes_by_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    uid: web::Path<String>,
) -> Fallible<web::Json<Vec<Like>>> {
    observe("likes_by_user", async {
        let user_id = resolve_user_ref(&uid, requester.as_ref())?;
        Ok(web::Json(state.ds.likes_by_user(user_id).await?))
    })
    .await
}

async fn likes_of_tuit<DS: Datastore>(
    state: web::Data<State<DS>>,
    tid: web::Path<Uuid>,
) -> Fallible<web::Json<Vec<Like>>> {
    observe("likes_of_tuit", async {
        Ok(web::Json(state.ds.likes_of_post(*tid).await?))
    })
    .await
}

async fn like<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<Like>> {
    observe("like", async {
        let (uid, post_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        state
            .ds
            .find_post(post_id)
            .await?
            .or_not_found("Tuit not found")?;
        Ok(web::Json(state.ds.new_like(user_id, post_id).await?))
    })
    .await
}

async fn unlike<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<Removed>> {
    observe("unlike", async {
        let (uid, post_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        let removed = state.ds.delete_like(user_id, post_id).await?;
        if removed == 0 {
            return Err(TfError::new(Cause::NotFound, "Like not found"));
        }
        Ok(web::Json(Removed { removed }))
    })
    .await
}
