use crate::datastore::{
    postfilters::PostFilters,
    postgres::PostgresStore,
    structs::{NewPost, Post, PostUpdate},
    tables::posts,
    PostStore,
};
use crate::twoface::Fallible;
use async_trait::async_trait;
use diesel::{
    expression::BoxableExpression,
    pg::Pg,
    query_dsl::{QueryDsl, RunQueryDsl},
    sql_types::Bool,
    ExpressionMethods, OptionalExtension, TextExpressionMethods,
};
use uuid::Uuid;

#[async_trait]
impl PostStore for PostgresStore {
    async fn new_post(&self, new_post: NewPost) -> Fallible<Post> {
        self.run(move |conn| {
            diesel::insert_into(posts::table)
                .values(&new_post)
                .get_result(conn)
        })
        .await
    }

    async fn find_post(&self, post_id: Uuid) -> Fallible<Option<Post>> {
        self.run(move |conn| posts::table.find(post_id).first::<Post>(conn).optional())
            .await
    }

    async fn list_posts(&self, filters: PostFilters) -> Fallible<Vec<Post>> {
        self.run(move |conn| {
            let mut query = posts::table.into_boxed();
            let limit = filters.limit;
            for filter in filters.as_sql_where() {
                query = query.filter(filter);
            }
            query
                .limit(limit as i64)
                .order_by(posts::posted_on)
                .load::<Post>(conn)
        })
        .await
    }

    async fn posts_by_author(&self, user_id: Uuid) -> Fallible<Vec<Post>> {
        self.run(move |conn| {
            posts::table
                .filter(posts::posted_by.eq(user_id))
                .order_by(posts::posted_on)
                .load::<Post>(conn)
        })
        .await
    }

    async fn update_post(&self, post_id: Uuid, update: PostUpdate) -> Fallible<Option<Post>> {
        self.run(move |conn| {
            diesel::update(posts::table.find(post_id))
                .set(&update)
                .get_result::<Post>(conn)
                .optional()
        })
        .await
    }

    async fn delete_post(&self, post_id: Uuid) -> Fallible<Option<Post>> {
        self.run(move |conn| {
            diesel::delete(posts::table.find(post_id))
                .get_result::<Post>(conn)
                .optional()
        })
        .await
    }

    async fn delete_posts_by_author(&self, user_id: Uuid) -> Fallible<usize> {
        self.run(move |conn| {
            diesel::delete(posts::table.filter(posts::posted_by.eq(user_id))).execute(conn)
        })
        .await
    }
}

impl PostFilters {
    pub fn as_sql_where(
        &self,
    ) -> Vec<Box<dyn BoxableExpression<posts::table, Pg, SqlType = Bool>>> {
        let mut wheres: Vec<Box<dyn BoxableExpression<posts::table, Pg, SqlType = Bool>>> =
            Vec::new();
        if let Some(id) = self.id {
            wheres.push(Box::new(posts::id.eq(id)))
        }
        if let Some(posted_by) = self.posted_by {
            wheres.push(Box::new(posts::posted_by.eq(posted_by)))
        }
        if let Some(substring) = &self.text_contains {
            wheres.push(Box::new(posts::text.like(format!("%{}%", substring))))
        }
        if let Some(before) = self.posted_before {
            wheres.push(Box::new(posts::posted_on.lt(before)))
        }
        if let Some(after) = self.posted_after {
            wheres.push(Box::new(posts::posted_on.gt(after)))
        }
        wheres
    }
}
