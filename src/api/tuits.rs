use crate::api::{authorize_for, observe, resolve_user_ref, State};
use crate::cascade::{self, PostDeletion, Requester};
use crate::datastore::{
    postfilters::PostFilters,
    structs::{NewPost, Post, PostUpdate},
    Datastore,
};
use crate::twoface::{Cause, Fallible, OrNotFound, TfError};
use actix_web::web;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/tuits").route(web::get().to(list_tuits::<DS>)))
        .service(
            web::resource("/tuits/{tid}")
                .route(web::get().to(get_tuit::<DS>))
                .route(web::put().to(update_tuit::<DS>))
                .route(web::delete().to(delete_tuit::<DS>)),
        )
        .service(
            web::resource("/users/{uid}/tuits")
                .route(web::get().to(tuits_by_user::<DS>))
                .route(web::post().to(write_tuit::<DS>)),
        );
}

#[derive(Serialize, Deserialize)]
pub struct WriteTuitBody {
    pub text: String,
}

fn check_text(text: &str) -> Fallible<()> {
    if text.trim().is_empty() {
        return Err(TfError::new(Cause::UserInvalidField, "Tuits can't be empty"));
    }
    Ok(())
}

async fn list_tuits<DS: Datastore>(
    state: web::Data<State<DS>>,
    filters: web::Query<PostFilters>,
) -> Fallible<web::Json<Vec<Post>>> {
    observe("list_tuits", async {
        let posts = state.ds.list_posts(filters.into_inner()).await?;
        Ok(web::Json(posts))
    })
    .await
}

async fn get_tuit<DS: Datastore>(
    state: web::Data<State<DS>>,
    tid: web::Path<Uuid>,
) -> Fallible<web::Json<Post>> {
    observe("get_tuit", async {
        let post = state
            .ds
            .find_post(*tid)
            .await?
            .or_not_found("Tuit not found")?;
        Ok(web::Json(post))
    })
    .await
}

async fn update_tuit<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    tid: web::Path<Uuid>,
    body: web::Json<PostUpdate>,
) -> Fallible<web::Json<Post>> {
    observe("update_tuit", async {
        check_text(&body.text)?;
        let post = state
            .ds
            .find_post(*tid)
            .await?
            .or_not_found("Tuit not found")?;
        authorize_for(&*state.ds, &requester, post.posted_by).await?;
        let post = state
            .ds
            .update_post(post.id, body.into_inner())
            .await?
            .or_not_found("Tuit not found")?;
        Ok(web::Json(post))
    })
    .await
}

/// Deletes the tuit and whatever the configured cascade scope takes with it.
async fn delete_tuit<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    tid: web::Path<Uuid>,
) -> Fallible<web::Json<PostDeletion>> {
    observe("delete_tuit", async {
        let deletion =
            cascade::delete_post(&*state.ds, &requester, *tid, state.post_scope).await?;
        Ok(web::Json(deletion))
    })
    .await
}

async fn tuits_by_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    uid: web::Path<String>,
) -> Fallible<web::Json<Vec<Post>>> {
    observe("tuits_by_user", async {
        let user_id = resolve_user_ref(&uid, requester.as_ref())?;
        let posts = state.ds.posts_by_author(user_id).await?;
        Ok(web::Json(posts))
    })
    .await
}

async fn write_tuit<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    uid: web::Path<String>,
    body: web::Json<WriteTuitBody>,
) -> Fallible<web::Json<Post>> {
    observe("write_tuit", async {
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        check_text(&body.text)?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        state
            .ds
            .find_user(user_id)
            .await?
            .or_not_found("User not found")?;
        let new_post = NewPost {
            text: body.into_inner().text,
            posted_by: user_id,
        };
        let post = state.ds.new_post(new_post).await?;
        Ok(web::Json(post))
    })
    .await
}
