use crate::api::{authorize_for, observe, resolve_user_ref, Removed, State};
use crate::cascade::{self, BookmarkToggle, Requester};
use crate::datastore::{structs::Bookmark, Datastore};
use crate::twoface::{Cause, Fallible, OrNotFound, TfError};
use actix_web::web;
use uuid::Uuid;

pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users/{uid}/bookmarks").route(web::get().to(bookmarks_by_user::<DS>)),
    )
    .service(
        web::resource("/users/{uid}/bookmarks/{tid}")
            .route(web::post().to(bookmark::<DS>))
            .route(web::put().to(toggle::<DS>))
            .route(web::delete().to(unbookmark::<DS>)),
    );
}

async fn bookmarks_by_user<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Option<Requester>,
    uid: web::Path<String>,
) -> Fallible<web::Json<Vec<Bookmark>>> {
    observe("bookmarks_by_user", async {
        let user_id = resolve_user_ref(&uid, requester.as_ref())?;
        let bookmarks = state.ds.bookmarks_by_user(user_id).await?;
        Ok(web::Json(bookmarks))
    })
    .await
}

async fn bookmark<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<Bookmark>> {
    observe("bookmark", async {
        let (uid, post_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        state
            .ds
            .find_post(post_id)
            .await?
            .or_not_found("Tuit not found")?;
        let bookmark = state.ds.new_bookmark(user_id, post_id).await?;
        Ok(web::Json(bookmark))
    })
    .await
}

async fn toggle<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<BookmarkToggle>> {
    observe("toggle_bookmark", async {
        let (uid, post_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        let toggled = cascade::toggle_bookmark(&*state.ds, &requester, user_id, post_id).await?;
        Ok(web::Json(toggled))
    })
    .await
}

async fn unbookmark<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    path: web::Path<(String, Uuid)>,
) -> Fallible<web::Json<Removed>> {
    observe("unbookmark", async {
        let (uid, post_id) = path.into_inner();
        let user_id = resolve_user_ref(&uid, Some(&requester))?;
        authorize_for(&*state.ds, &requester, user_id).await?;
        let removed = state.ds.delete_bookmark(user_id, post_id).await?;
        if removed == 0 {
            return Err(TfError::new(Cause::NotFound, "Bookmark not found"));
        }
        Ok(web::Json(Removed { removed }))
    })
    .await
}
