use crate::datastore::{
    postgres::PostgresStore, structs::Bookmark, tables::bookmarks, BookmarkStore,
};
use crate::twoface::Fallible;
use async_trait::async_trait;
use diesel::{
    query_dsl::{QueryDsl, RunQueryDsl},
    ExpressionMethods, OptionalExtension,
};
use uuid::Uuid;

#[async_trait]
impl BookmarkStore for PostgresStore {
    async fn new_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Bookmark> {
        self.run(move |conn| {
            diesel::insert_into(bookmarks::table)
                .values(&Bookmark::new(user_id, post_id))
                .get_result(conn)
        })
        .await
    }

    async fn find_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<Option<Bookmark>> {
        self.run(move |conn| {
            bookmarks::table
                .find((user_id, post_id))
                .first::<Bookmark>(conn)
                .optional()
        })
        .await
    }

    async fn bookmarks_by_user(&self, user_id: Uuid) -> Fallible<Vec<Bookmark>> {
        self.run(move |conn| {
            bookmarks::table
                .filter(bookmarks::bookmarked_by.eq(user_id))
                .order_by(bookmarks::created_at)
                .load::<Bookmark>(conn)
        })
        .await
    }

    async fn bookmarks_of_post(&self, post_id: Uuid) -> Fallible<Vec<Bookmark>> {
        self.run(move |conn| {
            bookmarks::table
                .filter(bookmarks::bookmarked_tuit.eq(post_id))
                .order_by(bookmarks::created_at)
                .load::<Bookmark>(conn)
        })
        .await
    }

    async fn delete_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| diesel::delete(bookmarks::table.find((user_id, post_id))).execute(conn))
            .await
    }

    async fn delete_bookmarks_of_post(&self, post_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| {
            diesel::delete(bookmarks::table.filter(bookmarks::bookmarked_tuit.eq(post_id)))
                .execute(conn)
        })
        .await
    }
}
