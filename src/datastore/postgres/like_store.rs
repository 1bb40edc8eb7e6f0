use crate::datastore::{postgres::PostgresStore, structs::Like, tables::likes, LikeStore};
use crate::twoface::Fallible;
use async_trait::async_trait;
use diesel::{
    query_dsl::{QueryDsl, RunQueryDsl},
    ExpressionMethods,
};
use uuid::Uuid;

#[async_trait]
impl LikeStore for PostgresStore {
    async fn new_like(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Like> {
        self.run(move |conn| {
            diesel::insert_into(likes::table)
                .values(&Like::new(user_id, post_id))
                .get_result(conn)
        })
        .await
    }

    async fn likes_by_user(&self, user_id: Uuid) -> Fallible<Vec<Like>> {
        self.run(move |conn| {
            likes::table
                .filter(likes::liked_by.eq(user_id))
                .order_by(likes::created_at)
                .load::<Like>(conn)
        })
        .await
    }

    async fn likes_of_post(&self, post_id: Uuid) -> Fallible<Vec<Like>> {
        self.run(move |conn| {
            likes::table
                .filter(likes::tuit.eq(post_id))
                .order_by(likes::created_at)
                .load::<Like>(conn)
        })
        .await
    }

    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| diesel::delete(likes::table.find((user_id, post_id))).execute(conn))
            .await
    }

    async fn delete_likes_of_post(&self, post_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| diesel::delete(likes::table.filter(likes::tuit.eq(post_id))).execute(conn))
            .await
    }

    async fn delete_likes_by_user(&self, user_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| {
            diesel::delete(likes::table.filter(likes::liked_by.eq(user_id))).execute(conn)
        })
        .await
    }
}
