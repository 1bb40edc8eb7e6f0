use crate::datastore::{postgres::PostgresStore, structs::Follow, tables::follows, FollowStore};
use crate::twoface::Fallible;
use async_trait::async_trait;
use diesel::{
    query_dsl::{QueryDsl, RunQueryDsl},
    ExpressionMethods,
};
use uuid::Uuid;

#[async_trait]
impl FollowStore for PostgresStore {
    async fn new_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Fallible<Follow> {
        self.run(move |conn| {
            diesel::insert_into(follows::table)
                .values(&Follow::new(follower_id, followed_id))
                .get_result(conn)
        })
        .await
    }

    async fn followers(&self, user_id: Uuid) -> Fallible<Vec<Follow>> {
        self.run(move |conn| {
            follows::table
                .filter(follows::user_followed.eq(user_id))
                .order_by(follows::created_at)
                .load::<Follow>(conn)
        })
        .await
    }

    async fn following(&self, user_id: Uuid) -> Fallible<Vec<Follow>> {
        self.run(move |conn| {
            follows::table
                .filter(follows::user_following.eq(user_id))
                .order_by(follows::created_at)
                .load::<Follow>(conn)
        })
        .await
    }

    async fn delete_follow(&self, follower_id: Uuid, followed_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| {
            diesel::delete(follows::table.find((follower_id, followed_id))).execute(conn)
        })
        .await
    }
}
