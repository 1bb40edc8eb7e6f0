use crate::api::{observe, require_admin, State};
use crate::cascade::Requester;
use crate::datastore::{postfilters::PostFilters, structs::Post, Datastore};
use crate::twoface::Fallible;
use actix_web::web;

pub fn configure<DS: Datastore>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/posts").route(web::get().to(list_all_posts::<DS>)));
}

// Admin endpoint
async fn list_all_posts<DS: Datastore>(
    state: web::Data<State<DS>>,
    requester: Requester,
    filters: web::Query<PostFilters>,
) -> Fallible<web::Json<Vec<Post>>> {
    observe("admin_list_posts", async {
        require_admin(&*state.ds, &requester).await?;
        let data = state.ds.list_posts(filters.into_inner()).await?;
        Ok(web::Json(data))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{bearer, user};
    use crate::datastore::mock::Client;
    use crate::datastore::structs::NewPost;
    use crate::datastore::PostStore;
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_admin_lists_everyones_posts() {
        let ds = Client::default();
        let admin = user(&ds, "admin", true).await;
        let alice = user(&ds, "alice", false).await;
        for text in &["one", "two"] {
            ds.new_post(NewPost {
                text: (*text).to_owned(),
                posted_by: alice.id,
            })
            .await
            .unwrap();
        }
        let mut app = test::init_service(
            App::new()
                .data(State {
                    ds: Arc::new(ds.clone()),
                    post_scope: Default::default(),
                })
                .data(crate::auth::TokenSecret(
                    crate::api::testing::SECRET.to_owned(),
                ))
                .service(web::scope("/admin").configure(configure::<Client>)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin/posts?text_contains=tw")
            .header("Authorization", bearer(&admin))
            .to_request();
        let posts: Vec<Post> = test::read_response_json(&mut app, req).await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "two");

        let req = test::TestRequest::get()
            .uri("/admin/posts")
            .header("Authorization", bearer(&alice))
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
