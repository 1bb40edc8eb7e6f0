use crate::datastore::{
    postfilters::UserFilters,
    postgres::PostgresStore,
    structs::{NewUser, User, UserUpdate},
    tables::users,
    UserStore,
};
use crate::twoface::Fallible;
use async_trait::async_trait;
use diesel::{
    query_dsl::{QueryDsl, RunQueryDsl},
    ExpressionMethods, OptionalExtension,
};
use uuid::Uuid;

#[async_trait]
impl UserStore for PostgresStore {
    async fn new_user(&self, new_user: NewUser) -> Fallible<User> {
        self.run(move |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .get_result(conn)
        })
        .await
    }

    async fn find_user(&self, user_id: Uuid) -> Fallible<Option<User>> {
        self.run(move |conn| users::table.find(user_id).first::<User>(conn).optional())
            .await
    }

    async fn list_users(&self, filters: UserFilters) -> Fallible<Vec<User>> {
        self.run(move |conn| {
            let mut query = users::table.into_boxed();
            if let Some(username) = filters.username {
                query = query.filter(users::username.eq(username));
            }
            if let Some(email) = filters.email {
                query = query.filter(users::email.eq(email));
            }
            query.order_by(users::created_at).load::<User>(conn)
        })
        .await
    }

    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> Fallible<Option<User>> {
        if update.is_empty() {
            return self.find_user(user_id).await;
        }
        self.run(move |conn| {
            diesel::update(users::table.find(user_id))
                .set(&update)
                .get_result::<User>(conn)
                .optional()
        })
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> Fallible<Option<User>> {
        self.run(move |conn| {
            diesel::delete(users::table.find(user_id))
                .get_result::<User>(conn)
                .optional()
        })
        .await
    }
}
